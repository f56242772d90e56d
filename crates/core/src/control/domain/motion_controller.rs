use std::sync::Arc;
use std::time::Duration;

use crate::control::domain::motion_intent::MotionIntent;
use crate::shared::clock::Clock;
use crate::shared::interval_timer::IntervalTimer;
use crate::shared::tracking_config::TrackingConfig;
use crate::tracking::domain::face_tracker::FaceTracker;
use crate::tracking::domain::subject_evaluator::SubjectEvaluator;

/// Tunables for [`MotionController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerPolicy {
    pub min_confidence: f64,
    pub home_zoom: u16,
    pub tracking_zoom: u16,
    pub base_speed: i32,
    pub home_pause: Duration,
    pub zoom_max_safety: Duration,
}

impl From<&TrackingConfig> for ControllerPolicy {
    fn from(config: &TrackingConfig) -> Self {
        Self {
            min_confidence: config.min_confidence,
            home_zoom: config.home_zoom,
            tracking_zoom: config.tracking_zoom,
            base_speed: config.base_speed,
            home_pause: config.home_pause(),
            zoom_max_safety: config.zoom_max_safety(),
        }
    }
}

/// `100 / face_count`, or zero when nothing was detected.
pub fn confidence_for(face_count: usize) -> f64 {
    if face_count > 0 {
        100.0 / face_count as f64
    } else {
        0.0
    }
}

/// Splits `base` between the axes in proportion to each offset magnitude.
///
/// Both offsets zero yields `base` on both axes.
pub fn split_speed(base: i32, offset_x: f64, offset_y: f64) -> (i32, i32) {
    let (ox, oy) = (offset_x.abs(), offset_y.abs());
    let total = ox + oy;
    if total <= 0.0 {
        return (base, base);
    }
    let pan = (base as f64 * ox / total).round() as i32;
    let tilt = (base as f64 * oy / total).round() as i32;
    (pan, tilt)
}

/// Picks one [`MotionIntent`] per tick and owns the home-pause and
/// zoom-safety rate limiters.
///
/// Decision order:
/// 1. subject not recently visible: `Home` when away from home and the
///    home-pause interval allows it, else `Stop`;
/// 2. no face this tick, or confidence below the minimum: `Stop`;
/// 3. home pause still running: `NoOp`;
/// 4. centered: one-shot `Zoom` to the tracking level when steady and a zoom
///    advance is pending, else `Stop`;
/// 5. otherwise `Track` toward the subject.
///
/// `at_home` and the requested zoom only change through
/// [`acknowledge`](Self::acknowledge), after the transport carried the
/// intent out.
pub struct MotionController {
    policy: ControllerPolicy,
    home_timer: IntervalTimer,
    zoom_timer: IntervalTimer,
    at_home: bool,
    requested_zoom: Option<u16>,
    confidence: f64,
}

impl MotionController {
    pub fn new(policy: ControllerPolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            home_timer: IntervalTimer::new(policy.home_pause, true, clock.clone()),
            zoom_timer: IntervalTimer::new(policy.zoom_max_safety, true, clock),
            policy,
            at_home: false,
            requested_zoom: None,
            confidence: 0.0,
        }
    }

    /// The Home issued once before the first tick.
    pub fn begin_session(&mut self) -> MotionIntent {
        self.home_timer.reset();
        MotionIntent::Home
    }

    pub fn decide(
        &mut self,
        face: &FaceTracker,
        subject: &SubjectEvaluator,
        face_count: usize,
    ) -> MotionIntent {
        self.confidence = confidence_for(face_count);

        if !face.is_recently_visible() {
            if !self.at_home && self.home_timer.has_elapsed() {
                log::info!("Subject gone, returning home");
                return MotionIntent::Home;
            }
            return MotionIntent::Stop;
        }

        if face_count == 0 || self.confidence < self.policy.min_confidence {
            return MotionIntent::Stop;
        }

        if self.at_home && !self.home_timer.is_elapsed() {
            return MotionIntent::NoOp;
        }

        if subject.is_centered() {
            if !subject.is_volatile() && self.zoom_pending() && self.zoom_timer.has_elapsed() {
                return MotionIntent::Zoom {
                    level: self.policy.tracking_zoom,
                };
            }
            return MotionIntent::Stop;
        }

        self.track_toward(subject)
    }

    /// Records that the transport carried `intent` out.
    pub fn acknowledge(&mut self, intent: &MotionIntent) {
        match *intent {
            MotionIntent::Home => {
                self.at_home = true;
                self.requested_zoom = Some(self.policy.home_zoom);
            }
            MotionIntent::Track { .. } => self.at_home = false,
            MotionIntent::Zoom { level } => self.requested_zoom = Some(level),
            MotionIntent::Stop | MotionIntent::NoOp => {}
        }
    }

    fn zoom_pending(&self) -> bool {
        self.requested_zoom
            .is_some_and(|z| z < self.policy.tracking_zoom)
    }

    fn track_toward(&self, subject: &SubjectEvaluator) -> MotionIntent {
        let pan_sign = if subject.is_far_left() {
            -1
        } else if subject.is_far_right() {
            1
        } else {
            0
        };
        let tilt_sign = if subject.is_far_up() {
            1
        } else if subject.is_far_down() {
            -1
        } else {
            0
        };

        let base = self.policy.base_speed;
        let (pan, tilt) = match (pan_sign, tilt_sign) {
            (0, 0) => return MotionIntent::NoOp,
            (_, 0) => (base, 0),
            (0, _) => (0, base),
            _ => {
                let (dx, dy) = subject.offset();
                split_speed(base, dx, dy)
            }
        };

        MotionIntent::Track {
            pan_speed: pan_sign * pan,
            tilt_speed: tilt_sign * tilt,
        }
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn is_at_home(&self) -> bool {
        self.at_home
    }

    pub fn requested_zoom(&self) -> Option<u16> {
        self.requested_zoom
    }
}
