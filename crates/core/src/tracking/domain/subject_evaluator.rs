use serde::{Deserialize, Serialize};

use crate::shared::frame_geometry::FrameGeometry;
use crate::shared::tracking_config::TrackingConfig;
use crate::tracking::domain::face_tracker::FaceTracker;
use crate::tracking::domain::offset_history::OffsetHistory;

/// What gets pushed into the offset history each visible tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryMetric {
    /// `|dx| * 2 / center_x * 100`: horizontal drift as a percentage figure.
    /// The default volatility threshold (9) is tuned for this unit.
    #[default]
    HorizontalPercent,
    /// Straight-line pixel distance from the frame center.
    Euclidean,
}

/// How an off-center subject is mapped onto direction flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuadrantRule {
    /// Vertical flags only outside a dead band around the horizontal center
    /// line; horizontal flags from the sign alone.
    #[default]
    MarginBanded,
    /// Both axes strictly from sign, no dead band.
    Strict,
}

/// Tunables for [`SubjectEvaluator`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluatorPolicy {
    pub centered_radius_fraction: f64,
    pub off_center_margin_fraction: f64,
    pub volatility_threshold: f64,
    pub history_metric: HistoryMetric,
    pub quadrant_rule: QuadrantRule,
}

impl From<&TrackingConfig> for EvaluatorPolicy {
    fn from(config: &TrackingConfig) -> Self {
        Self {
            centered_radius_fraction: config.centered_radius_fraction,
            off_center_margin_fraction: config.off_center_margin_fraction,
            volatility_threshold: config.volatility_threshold,
            history_metric: config.history_metric,
            quadrant_rule: config.quadrant_rule,
        }
    }
}

impl Default for EvaluatorPolicy {
    fn default() -> Self {
        Self::from(&TrackingConfig::default())
    }
}

/// Characterizes the subject's position relative to the frame center.
///
/// Offsets are signed `frame_center - face_center`, so a positive `dx` means
/// the subject sits left of center and a positive `dy` means above it.
pub struct SubjectEvaluator {
    policy: EvaluatorPolicy,
    history: OffsetHistory,
    position: Option<(f64, f64)>,
    offset: (f64, f64),
    is_present: bool,
    is_centered: bool,
    is_far_left: bool,
    is_far_right: bool,
    is_far_up: bool,
    is_far_down: bool,
}

impl SubjectEvaluator {
    pub fn new(policy: EvaluatorPolicy) -> Self {
        Self {
            policy,
            history: OffsetHistory::default(),
            position: None,
            offset: (0.0, 0.0),
            is_present: false,
            is_centered: false,
            is_far_left: false,
            is_far_right: false,
            is_far_up: false,
            is_far_down: false,
        }
    }

    pub fn evaluate(&mut self, face: &FaceTracker, geometry: &FrameGeometry) {
        if !face.is_visible() {
            if face.is_recently_visible() {
                // Brief dropout: hold the last characterization.
                self.is_present = true;
            } else {
                self.reset_to_absent();
            }
            return;
        }

        let Some((x, y)) = face.center() else {
            self.reset_to_absent();
            return;
        };

        let (cx, cy) = geometry.center();
        let dx = cx - x;
        let dy = cy - y;
        let distance = dx.hypot(dy);

        self.is_present = true;
        self.position = Some((x, y));
        self.offset = (dx, dy);
        self.history.push(match self.policy.history_metric {
            HistoryMetric::HorizontalPercent => dx.abs() * 2.0 / cx * 100.0,
            HistoryMetric::Euclidean => distance,
        });

        let radius = geometry.centered_radius(self.policy.centered_radius_fraction);
        self.is_centered = distance <= radius;
        if self.is_centered {
            self.clear_directions();
            return;
        }

        match self.policy.quadrant_rule {
            QuadrantRule::MarginBanded => {
                let margin = geometry.off_center_margin(self.policy.off_center_margin_fraction);
                self.is_far_up = y < cy - margin;
                self.is_far_down = y > cy + margin;
            }
            QuadrantRule::Strict => {
                self.is_far_up = y < cy;
                self.is_far_down = y > cy;
            }
        }
        self.is_far_left = x < cx;
        self.is_far_right = x > cx;

        log::trace!(
            "subject at ({x:.0}, {y:.0}) offset ({dx:.0}, {dy:.0}) d={distance:.1} r={radius:.1}"
        );
    }

    /// Unstable when fewer than two samples exist, or when the mean change
    /// between consecutive samples exceeds the threshold.
    pub fn is_volatile(&self) -> bool {
        self.history
            .mean_abs_delta()
            .map_or(true, |avg| avg > self.policy.volatility_threshold)
    }

    fn reset_to_absent(&mut self) {
        self.position = None;
        self.offset = (0.0, 0.0);
        self.is_present = false;
        self.is_centered = false;
        self.clear_directions();
    }

    fn clear_directions(&mut self) {
        self.is_far_left = false;
        self.is_far_right = false;
        self.is_far_up = false;
        self.is_far_down = false;
    }

    pub fn offset(&self) -> (f64, f64) {
        self.offset
    }

    pub fn position(&self) -> Option<(f64, f64)> {
        self.position
    }

    pub fn history(&self) -> &OffsetHistory {
        &self.history
    }

    pub fn is_present(&self) -> bool {
        self.is_present
    }

    pub fn is_centered(&self) -> bool {
        self.is_centered
    }

    pub fn is_far_left(&self) -> bool {
        self.is_far_left
    }

    pub fn is_far_right(&self) -> bool {
        self.is_far_right
    }

    pub fn is_far_up(&self) -> bool {
        self.is_far_up
    }

    pub fn is_far_down(&self) -> bool {
        self.is_far_down
    }
}
