use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{command} not acknowledged within {after:?}")]
    Timeout {
        command: &'static str,
        after: Duration,
    },
    #[error("camera rejected {command}: {reason}")]
    Rejected {
        command: &'static str,
        reason: String,
    },
    #[error("camera link failed: {0}")]
    Link(#[source] std::io::Error),
}

/// How long a command may hold the tick before the transport gives up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandWait {
    /// Return as soon as the command is sent.
    Fire,
    /// Wait for the camera's completion, at most this long.
    Blocking(Duration),
}

/// A pan/tilt request: either continuous motion at signed speeds, or an
/// absolute slew to `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanTiltCommand {
    pub pan_speed: i32,
    pub tilt_speed: i32,
    pub position: Option<(i32, i32)>,
    pub wait: CommandWait,
}

impl PanTiltCommand {
    pub fn stop(wait: CommandWait) -> Self {
        Self::moving(0, 0, wait)
    }

    pub fn moving(pan_speed: i32, tilt_speed: i32, wait: CommandWait) -> Self {
        Self {
            pan_speed,
            tilt_speed,
            position: None,
            wait,
        }
    }

    pub fn absolute(pan: i32, tilt: i32, speed: i32, wait: CommandWait) -> Self {
        Self {
            pan_speed: speed,
            tilt_speed: speed,
            position: Some((pan, tilt)),
            wait,
        }
    }

    pub fn is_stop(&self) -> bool {
        self.position.is_none() && self.pan_speed == 0 && self.tilt_speed == 0
    }
}

/// Driver for the physical camera link.
///
/// Calls may block up to the requested [`CommandWait`] bound. A bounded wait
/// that expires must surface as [`TransportError::Timeout`], never as a
/// silent success.
pub trait MotionTransport: Send {
    fn pan_tilt(&mut self, unit: u8, command: &PanTiltCommand) -> Result<(), TransportError>;

    fn set_zoom(&mut self, unit: u8, level: u16, wait: CommandWait) -> Result<(), TransportError>;

    /// Halts any zoom in progress.
    fn stop_zoom(&mut self, unit: u8) -> Result<(), TransportError>;
}
