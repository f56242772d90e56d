use std::time::Duration;

use crate::control::domain::motion_intent::MotionIntent;
use crate::control::domain::motion_transport::{
    CommandWait, MotionTransport, PanTiltCommand, TransportError,
};
use crate::shared::tracking_config::TrackingConfig;

/// Fixed camera-side parameters needed to turn intents into commands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagePlan {
    pub camera_unit: u8,
    pub home_pan: i32,
    pub home_tilt: i32,
    pub home_zoom: u16,
    pub return_home_speed: i32,
    pub command_timeout: Duration,
    pub zoom_max_safety: Duration,
}

impl From<&TrackingConfig> for StagePlan {
    fn from(config: &TrackingConfig) -> Self {
        Self {
            camera_unit: config.camera_unit,
            home_pan: config.home_pan,
            home_tilt: config.home_tilt,
            home_zoom: config.home_zoom,
            return_home_speed: config.return_home_speed,
            command_timeout: config.command_timeout(),
            zoom_max_safety: config.zoom_max_safety(),
        }
    }
}

/// Expands a [`MotionIntent`] into transport primitives.
///
/// Intents that stop motion begin with a blocking zero-speed pan/tilt.
/// Commands are issued strictly one after another; the first failure aborts
/// the rest of the sequence and is returned unchanged.
pub struct MotionExecutor {
    plan: StagePlan,
}

impl MotionExecutor {
    pub fn new(plan: StagePlan) -> Self {
        Self { plan }
    }

    pub fn execute(
        &self,
        intent: &MotionIntent,
        transport: &mut dyn MotionTransport,
    ) -> Result<(), TransportError> {
        let unit = self.plan.camera_unit;
        let blocking = CommandWait::Blocking(self.plan.command_timeout);

        if intent.stops_motion() {
            transport.pan_tilt(unit, &PanTiltCommand::stop(blocking))?;
        }

        match *intent {
            MotionIntent::NoOp | MotionIntent::Stop => Ok(()),
            MotionIntent::Track {
                pan_speed,
                tilt_speed,
            } => transport.pan_tilt(
                unit,
                &PanTiltCommand::moving(pan_speed, tilt_speed, CommandWait::Fire),
            ),
            MotionIntent::Home => {
                transport.pan_tilt(
                    unit,
                    &PanTiltCommand::absolute(
                        self.plan.home_pan,
                        self.plan.home_tilt,
                        self.plan.return_home_speed,
                        blocking,
                    ),
                )?;
                transport.set_zoom(unit, self.plan.home_zoom, blocking)
            }
            MotionIntent::Zoom { level } => self.bounded_zoom(unit, level, transport),
        }
    }

    /// Zooms under the safety bound, halting the lens if the bound expires.
    fn bounded_zoom(
        &self,
        unit: u8,
        level: u16,
        transport: &mut dyn MotionTransport,
    ) -> Result<(), TransportError> {
        let wait = CommandWait::Blocking(self.plan.zoom_max_safety);
        match transport.set_zoom(unit, level, wait) {
            Err(e @ TransportError::Timeout { .. }) => {
                log::warn!("Zoom to {level} exceeded safety bound, aborting");
                if let Err(stop_err) = transport.stop_zoom(unit) {
                    log::warn!("Zoom abort failed: {stop_err}");
                }
                Err(e)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        PanTilt(u8, PanTiltCommand),
        Zoom(u8, u16, CommandWait),
        StopZoom(u8),
    }

    #[derive(Default)]
    struct StubTransport {
        calls: Vec<Call>,
        fail_pan_tilt_at: Option<usize>,
        zoom_times_out: bool,
    }

    impl MotionTransport for StubTransport {
        fn pan_tilt(&mut self, unit: u8, command: &PanTiltCommand) -> Result<(), TransportError> {
            let index = self.calls.len();
            self.calls.push(Call::PanTilt(unit, *command));
            if self.fail_pan_tilt_at == Some(index) {
                return Err(TransportError::Rejected {
                    command: "pan_tilt",
                    reason: "busy".into(),
                });
            }
            Ok(())
        }

        fn set_zoom(
            &mut self,
            unit: u8,
            level: u16,
            wait: CommandWait,
        ) -> Result<(), TransportError> {
            self.calls.push(Call::Zoom(unit, level, wait));
            if self.zoom_times_out {
                let after = match wait {
                    CommandWait::Blocking(d) => d,
                    CommandWait::Fire => Duration::ZERO,
                };
                return Err(TransportError::Timeout {
                    command: "set_zoom",
                    after,
                });
            }
            Ok(())
        }

        fn stop_zoom(&mut self, unit: u8) -> Result<(), TransportError> {
            self.calls.push(Call::StopZoom(unit));
            Ok(())
        }
    }

    fn plan() -> StagePlan {
        StagePlan {
            camera_unit: 2,
            home_pan: -100,
            home_tilt: 30,
            home_zoom: 0,
            return_home_speed: 14,
            command_timeout: Duration::from_secs(5),
            zoom_max_safety: Duration::from_secs(3),
        }
    }

    fn blocking() -> CommandWait {
        CommandWait::Blocking(Duration::from_secs(5))
    }

    #[test]
    fn test_noop_sends_nothing() {
        let mut transport = StubTransport::default();
        MotionExecutor::new(plan())
            .execute(&MotionIntent::NoOp, &mut transport)
            .unwrap();
        assert!(transport.calls.is_empty());
    }

    #[test]
    fn test_stop_is_blocking_zero_speed() {
        let mut transport = StubTransport::default();
        MotionExecutor::new(plan())
            .execute(&MotionIntent::Stop, &mut transport)
            .unwrap();
        assert_eq!(
            transport.calls,
            vec![Call::PanTilt(2, PanTiltCommand::stop(blocking()))]
        );
    }

    #[test]
    fn test_track_fires_without_waiting() {
        let mut transport = StubTransport::default();
        let intent = MotionIntent::Track {
            pan_speed: -6,
            tilt_speed: 4,
        };
        MotionExecutor::new(plan())
            .execute(&intent, &mut transport)
            .unwrap();
        assert_eq!(
            transport.calls,
            vec![Call::PanTilt(
                2,
                PanTiltCommand::moving(-6, 4, CommandWait::Fire)
            )]
        );
    }

    #[test]
    fn test_home_sequence() {
        let mut transport = StubTransport::default();
        MotionExecutor::new(plan())
            .execute(&MotionIntent::Home, &mut transport)
            .unwrap();
        assert_eq!(
            transport.calls,
            vec![
                Call::PanTilt(2, PanTiltCommand::stop(blocking())),
                Call::PanTilt(2, PanTiltCommand::absolute(-100, 30, 14, blocking())),
                Call::Zoom(2, 0, blocking()),
            ]
        );
    }

    #[test]
    fn test_home_aborts_on_first_failure() {
        let mut transport = StubTransport {
            fail_pan_tilt_at: Some(1),
            ..Default::default()
        };
        let err = MotionExecutor::new(plan())
            .execute(&MotionIntent::Home, &mut transport)
            .unwrap_err();
        assert!(matches!(err, TransportError::Rejected { .. }));
        assert_eq!(transport.calls.len(), 2);
    }

    #[test]
    fn test_zoom_stops_then_zooms_under_safety_bound() {
        let mut transport = StubTransport::default();
        MotionExecutor::new(plan())
            .execute(&MotionIntent::Zoom { level: 8000 }, &mut transport)
            .unwrap();
        assert_eq!(
            transport.calls,
            vec![
                Call::PanTilt(2, PanTiltCommand::stop(blocking())),
                Call::Zoom(2, 8000, CommandWait::Blocking(Duration::from_secs(3))),
            ]
        );
    }

    #[test]
    fn test_zoom_timeout_aborts_and_surfaces() {
        let mut transport = StubTransport {
            zoom_times_out: true,
            ..Default::default()
        };
        let err = MotionExecutor::new(plan())
            .execute(&MotionIntent::Zoom { level: 8000 }, &mut transport)
            .unwrap_err();
        assert!(matches!(err, TransportError::Timeout { .. }));
        assert_eq!(transport.calls.last(), Some(&Call::StopZoom(2)));
    }
}
