use serde::{Deserialize, Serialize};

use crate::shared::region::Region;

/// Rule for picking the one box the tracker follows when a frame holds
/// several.
///
/// Every rule breaks ties by lowest detector index, so the same input always
/// yields the same pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionRule {
    /// Largest box area; the nearest face is usually the speaker.
    #[default]
    Largest,
    /// Center nearest to the previously tracked center. Falls back to
    /// `Largest` when nothing has been tracked yet.
    ClosestToPrevious,
    /// Whatever the detector reported first.
    First,
}

impl SelectionRule {
    pub fn select<'a>(
        &self,
        regions: &'a [Region],
        previous: Option<(f64, f64)>,
    ) -> Option<&'a Region> {
        match (self, previous) {
            (SelectionRule::First, _) => regions.first(),
            (SelectionRule::ClosestToPrevious, Some(prev)) => {
                min_by_key_f64(regions, |r| r.distance_to(prev))
            }
            (SelectionRule::Largest, _) | (SelectionRule::ClosestToPrevious, None) => {
                min_by_key_f64(regions, |r| -(r.area() as f64))
            }
        }
    }
}

/// First region with the minimal key; later equal keys never win.
fn min_by_key_f64(regions: &[Region], key: impl Fn(&Region) -> f64) -> Option<&Region> {
    let mut best: Option<(&Region, f64)> = None;
    for r in regions {
        let k = key(r);
        match best {
            Some((_, best_k)) if k >= best_k => {}
            _ => best = Some((r, k)),
        }
    }
    best.map(|(r, _)| r)
}
