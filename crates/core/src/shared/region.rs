use serde::{Deserialize, Serialize};

/// A detected face bounding box in frame pixel coordinates.
///
/// Serialized as a bare `[x, y, width, height]` array so detection scripts
/// stay compact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i32; 4]", into = "[i32; 4]")]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Box center as reported to the tracker: `(x + w/2, y + h/2)`.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Area in square pixels; degenerate boxes count as zero.
    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }

    pub fn distance_to(&self, point: (f64, f64)) -> f64 {
        let (cx, cy) = self.center();
        (cx - point.0).hypot(cy - point.1)
    }
}

impl From<[i32; 4]> for Region {
    fn from(v: [i32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<Region> for [i32; 4] {
    fn from(r: Region) -> Self {
        [r.x, r.y, r.width, r.height]
    }
}
