use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::shared::clock::Clock;

/// Rate limiter answering "has `interval` passed since the last reset?".
///
/// A positive [`has_elapsed`](Self::has_elapsed) check resets the timer, so a
/// caller polling every tick sees at most one `true` per interval.
pub struct IntervalTimer {
    interval: Duration,
    clock: Arc<dyn Clock>,
    last_reset: Option<Instant>,
}

impl IntervalTimer {
    /// With `start_elapsed`, the first check succeeds immediately.
    pub fn new(interval: Duration, start_elapsed: bool, clock: Arc<dyn Clock>) -> Self {
        let last_reset = if start_elapsed { None } else { Some(clock.now()) };
        Self {
            interval,
            clock,
            last_reset,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Checks without resetting.
    pub fn is_elapsed(&self) -> bool {
        match self.last_reset {
            None => true,
            Some(at) => self.clock.now().saturating_duration_since(at) >= self.interval,
        }
    }

    /// Checks and, when the interval has passed, resets the timer.
    pub fn has_elapsed(&mut self) -> bool {
        if self.is_elapsed() {
            self.reset();
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.last_reset = Some(self.clock.now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::clock::ManualClock;
    use rstest::rstest;

    fn timer(secs: u64, start_elapsed: bool) -> (IntervalTimer, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let t = IntervalTimer::new(Duration::from_secs(secs), start_elapsed, clock.clone());
        (t, clock)
    }

    #[rstest]
    #[case::starts_elapsed(true, true)]
    #[case::starts_armed(false, false)]
    fn test_initial_state(#[case] start_elapsed: bool, #[case] expected: bool) {
        let (t, _clock) = timer(5, start_elapsed);
        assert_eq!(t.is_elapsed(), expected);
    }

    #[test]
    fn test_positive_check_resets() {
        let (mut t, clock) = timer(5, true);
        assert!(t.has_elapsed());
        assert!(!t.has_elapsed());

        clock.advance_secs(4.9);
        assert!(!t.has_elapsed());

        clock.advance_secs(0.1);
        assert!(t.has_elapsed());
        assert!(!t.is_elapsed());
    }

    #[test]
    fn test_is_elapsed_does_not_reset() {
        let (t, clock) = timer(2, false);
        clock.advance_secs(3.0);
        assert!(t.is_elapsed());
        assert!(t.is_elapsed());
    }
}
