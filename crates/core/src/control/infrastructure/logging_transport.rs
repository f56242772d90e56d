use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::control::domain::motion_transport::{
    CommandWait, MotionTransport, PanTiltCommand, TransportError,
};

/// A command as seen by [`LoggingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuedCommand {
    PanTilt { unit: u8, command: PanTiltCommand },
    SetZoom { unit: u8, level: u16, wait: CommandWait },
    StopZoom { unit: u8 },
}

/// Transport that drives no hardware: every command is logged, counted and
/// acknowledged immediately.
///
/// Used for dry runs against recorded detections. The journal of issued
/// commands is opt-in and keeps only the newest `capacity` entries, so an
/// endless session stays bounded.
#[derive(Clone, Default)]
pub struct LoggingTransport {
    journal: Arc<Mutex<Journal>>,
}

#[derive(Default)]
struct Journal {
    entries: VecDeque<IssuedCommand>,
    capacity: usize,
    total: usize,
}

impl LoggingTransport {
    /// Counts commands without keeping them.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also keeps the newest `capacity` commands for inspection.
    pub fn with_journal(capacity: usize) -> Self {
        Self {
            journal: Arc::new(Mutex::new(Journal {
                capacity,
                ..Journal::default()
            })),
        }
    }

    /// Journaled commands, oldest first.
    pub fn commands(&self) -> Vec<IssuedCommand> {
        self.lock().entries.iter().cloned().collect()
    }

    /// Every command issued so far, journaled or not.
    pub fn command_count(&self) -> usize {
        self.lock().total
    }

    fn lock(&self) -> MutexGuard<'_, Journal> {
        self.journal.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, command: IssuedCommand) {
        let mut journal = self.lock();
        journal.total += 1;
        if journal.capacity == 0 {
            return;
        }
        if journal.entries.len() == journal.capacity {
            journal.entries.pop_front();
        }
        journal.entries.push_back(command);
    }
}

impl MotionTransport for LoggingTransport {
    fn pan_tilt(&mut self, unit: u8, command: &PanTiltCommand) -> Result<(), TransportError> {
        match command.position {
            Some((pan, tilt)) => log::info!(
                "[cam {unit}] slew to pan {pan} tilt {tilt} at speed {}",
                command.pan_speed
            ),
            None if command.is_stop() => log::debug!("[cam {unit}] stop"),
            None => log::info!(
                "[cam {unit}] move pan {:+} tilt {:+}",
                command.pan_speed,
                command.tilt_speed
            ),
        }
        self.record(IssuedCommand::PanTilt {
            unit,
            command: *command,
        });
        Ok(())
    }

    fn set_zoom(&mut self, unit: u8, level: u16, wait: CommandWait) -> Result<(), TransportError> {
        log::info!("[cam {unit}] zoom to {level}");
        self.record(IssuedCommand::SetZoom { unit, level, wait });
        Ok(())
    }

    fn stop_zoom(&mut self, unit: u8) -> Result<(), TransportError> {
        log::info!("[cam {unit}] zoom stop");
        self.record(IssuedCommand::StopZoom { unit });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_records_in_order() {
        let mut transport = LoggingTransport::with_journal(8);
        let stop = PanTiltCommand::stop(CommandWait::Blocking(Duration::from_secs(1)));
        transport.pan_tilt(1, &stop).unwrap();
        transport.set_zoom(1, 500, CommandWait::Fire).unwrap();
        transport.stop_zoom(1).unwrap();

        assert_eq!(
            transport.commands(),
            vec![
                IssuedCommand::PanTilt {
                    unit: 1,
                    command: stop
                },
                IssuedCommand::SetZoom {
                    unit: 1,
                    level: 500,
                    wait: CommandWait::Fire
                },
                IssuedCommand::StopZoom { unit: 1 },
            ]
        );
    }

    #[test]
    fn test_clones_share_journal() {
        let observer = LoggingTransport::new();
        let mut transport = observer.clone();
        transport
            .pan_tilt(3, &PanTiltCommand::moving(5, 0, CommandWait::Fire))
            .unwrap();
        assert_eq!(observer.command_count(), 1);
    }

    #[test]
    fn test_journal_keeps_only_newest() {
        let mut transport = LoggingTransport::with_journal(2);
        for level in [100, 200, 300] {
            transport.set_zoom(1, level, CommandWait::Fire).unwrap();
        }

        let levels: Vec<u16> = transport
            .commands()
            .into_iter()
            .map(|c| match c {
                IssuedCommand::SetZoom { level, .. } => level,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(levels, vec![200, 300]);
        assert_eq!(transport.command_count(), 3);
    }

    #[test]
    fn test_default_only_counts() {
        let mut transport = LoggingTransport::new();
        transport.stop_zoom(1).unwrap();
        assert!(transport.commands().is_empty());
        assert_eq!(transport.command_count(), 1);
    }
}
