/// Static description of the viewing frame.
///
/// Detection coordinates are pixels with the origin at the top-left corner,
/// so `y` grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
}

impl FrameGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Radius of the "centered" disc, as a fraction of frame height.
    pub fn centered_radius(&self, fraction: f64) -> f64 {
        fraction * self.height as f64
    }

    /// Half-height of the vertical dead band around the center line.
    pub fn off_center_margin(&self, fraction: f64) -> f64 {
        fraction * self.height as f64
    }
}
