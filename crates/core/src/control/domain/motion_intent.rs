use std::fmt;

/// The single motion decision produced per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionIntent {
    /// Halt pan/tilt motion.
    Stop,
    /// Stop, slew to the home pan/tilt, then set the home zoom.
    Home,
    /// Continuous pan/tilt at signed speeds. Negative pan moves left,
    /// positive tilt moves up.
    Track { pan_speed: i32, tilt_speed: i32 },
    /// Absolute zoom to `level`.
    Zoom { level: u16 },
    /// Leave the camera alone this tick.
    NoOp,
}

impl MotionIntent {
    /// Whether executing this intent halts any ongoing pan/tilt motion.
    pub fn stops_motion(&self) -> bool {
        matches!(
            self,
            MotionIntent::Stop | MotionIntent::Home | MotionIntent::Zoom { .. }
        )
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, MotionIntent::NoOp)
    }

    pub fn name(&self) -> &'static str {
        match self {
            MotionIntent::Stop => "stop",
            MotionIntent::Home => "home",
            MotionIntent::Track { .. } => "track",
            MotionIntent::Zoom { .. } => "zoom",
            MotionIntent::NoOp => "noop",
        }
    }
}

impl fmt::Display for MotionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionIntent::Track {
                pan_speed,
                tilt_speed,
            } => write!(f, "track(pan {pan_speed:+}, tilt {tilt_speed:+})"),
            MotionIntent::Zoom { level } => write!(f, "zoom({level})"),
            other => f.write_str(other.name()),
        }
    }
}
