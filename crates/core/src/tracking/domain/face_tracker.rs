use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::shared::clock::Clock;

/// Where the tracked subject stands, derived from the last `found`/`lost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    /// Never detected this session.
    Unseen,
    /// Detected on the latest tick.
    Visible,
    /// Missing, but seen within the recency threshold.
    RecentlyLost,
    /// Missing for longer than the recency threshold.
    StaleLost,
}

/// Visibility and recency bookkeeping for the single tracked subject slot.
///
/// Driven purely by one `found` or `lost` call per tick; the only notion of
/// time is comparing the clock against `last_seen`.
pub struct FaceTracker {
    recent_threshold: Duration,
    clock: Arc<dyn Clock>,
    visible: bool,
    recently_visible: bool,
    just_disappeared: bool,
    first_seen: Option<Instant>,
    last_seen: Option<Instant>,
    center: Option<(f64, f64)>,
}

impl FaceTracker {
    pub fn new(recent_threshold: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            recent_threshold,
            clock,
            visible: false,
            recently_visible: false,
            just_disappeared: false,
            first_seen: None,
            last_seen: None,
            center: None,
        }
    }

    pub fn found(&mut self, x: f64, y: f64) {
        let now = self.clock.now();
        if !self.visible {
            self.first_seen = Some(now);
        }
        self.last_seen = Some(now);
        self.center = Some((x, y));
        self.visible = true;
        self.recently_visible = true;
        self.just_disappeared = false;
    }

    pub fn lost(&mut self) {
        let now = self.clock.now();
        self.just_disappeared = self.visible;
        if self.visible {
            self.first_seen = None;
        }
        self.recently_visible = self
            .last_seen
            .is_some_and(|seen| now.saturating_duration_since(seen) <= self.recent_threshold);
        self.visible = false;
    }

    /// Dispatches to [`found`](Self::found) or [`lost`](Self::lost).
    pub fn update(&mut self, center: Option<(f64, f64)>) {
        match center {
            Some((x, y)) => self.found(x, y),
            None => self.lost(),
        }
    }

    /// How long the subject has been continuously visible; zero otherwise.
    pub fn age(&self) -> Duration {
        match self.first_seen {
            Some(at) => self.clock.now().saturating_duration_since(at),
            None => Duration::ZERO,
        }
    }

    pub fn state(&self) -> TrackingState {
        if self.visible {
            TrackingState::Visible
        } else if self.recently_visible {
            TrackingState::RecentlyLost
        } else if self.last_seen.is_some() {
            TrackingState::StaleLost
        } else {
            TrackingState::Unseen
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_recently_visible(&self) -> bool {
        self.recently_visible
    }

    /// True only on the tick the subject went from visible to lost.
    pub fn just_disappeared(&self) -> bool {
        self.just_disappeared
    }

    /// Last detection center, while the subject is visible or recently so.
    pub fn center(&self) -> Option<(f64, f64)> {
        if self.visible || self.recently_visible {
            self.center
        } else {
            None
        }
    }

    pub fn first_seen(&self) -> Option<Instant> {
        self.first_seen
    }

    pub fn last_seen(&self) -> Option<Instant> {
        self.last_seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::clock::ManualClock;

    fn tracker(threshold_secs: f64) -> (FaceTracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let t = FaceTracker::new(Duration::from_secs_f64(threshold_secs), clock.clone());
        (t, clock)
    }

    #[test]
    fn test_starts_unseen() {
        let (t, _) = tracker(1.0);
        assert_eq!(t.state(), TrackingState::Unseen);
        assert!(!t.is_visible());
        assert!(!t.is_recently_visible());
        assert!(t.center().is_none());
        assert_eq!(t.age(), Duration::ZERO);
    }

    #[test]
    fn test_lost_before_ever_seen_is_never_recent() {
        let (mut t, _) = tracker(1000.0);
        t.lost();
        assert!(!t.is_recently_visible());
        assert_eq!(t.state(), TrackingState::Unseen);
        assert!(!t.just_disappeared());
    }

    #[test]
    fn test_found_sets_visible_and_center() {
        let (mut t, _) = tracker(1.0);
        t.found(10.0, 20.0);
        assert_eq!(t.state(), TrackingState::Visible);
        assert!(t.is_recently_visible());
        assert_eq!(t.center(), Some((10.0, 20.0)));
    }

    #[test]
    fn test_first_seen_kept_while_continuously_visible() {
        let (mut t, clock) = tracker(1.0);
        t.found(10.0, 10.0);
        let first = t.first_seen();
        clock.advance_secs(0.5);
        t.found(12.0, 10.0);
        assert_eq!(t.first_seen(), first);
        assert_ne!(t.last_seen(), first);
        assert_eq!(t.age(), Duration::from_millis(500));
    }

    #[test]
    fn test_lost_within_threshold_is_recent() {
        let (mut t, clock) = tracker(2.0);
        t.found(10.0, 10.0);
        clock.advance_secs(1.0);
        t.lost();
        assert_eq!(t.state(), TrackingState::RecentlyLost);
        assert!(t.just_disappeared());
        assert!(t.first_seen().is_none());
        assert_eq!(t.age(), Duration::ZERO);
        assert_eq!(t.center(), Some((10.0, 10.0)));
    }

    #[test]
    fn test_lost_beyond_threshold_is_stale() {
        let (mut t, clock) = tracker(1.0);
        t.found(10.0, 10.0);
        clock.advance_secs(1.5);
        t.lost();
        assert!(!t.is_recently_visible());
        assert_eq!(t.state(), TrackingState::StaleLost);
        assert!(t.center().is_none());
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let (mut t, clock) = tracker(1.0);
        t.found(10.0, 10.0);
        clock.advance_secs(1.0);
        t.lost();
        assert!(t.is_recently_visible());
    }

    #[test]
    fn test_recency_recomputed_on_every_lost() {
        let (mut t, clock) = tracker(1.0);
        t.found(10.0, 10.0);
        t.lost();
        assert!(t.is_recently_visible());
        assert!(t.just_disappeared());

        clock.advance_secs(0.6);
        t.lost();
        assert!(t.is_recently_visible());
        assert!(!t.just_disappeared());

        clock.advance_secs(0.6);
        t.lost();
        assert!(!t.is_recently_visible());
    }

    #[test]
    fn test_reappearance_restarts_age() {
        let (mut t, clock) = tracker(5.0);
        t.found(10.0, 10.0);
        clock.advance_secs(3.0);
        t.lost();
        clock.advance_secs(1.0);
        t.found(11.0, 11.0);
        clock.advance_secs(0.25);
        assert_eq!(t.age(), Duration::from_millis(250));
    }

    #[test]
    fn test_update_dispatches() {
        let (mut t, _) = tracker(1.0);
        t.update(Some((5.0, 6.0)));
        assert!(t.is_visible());
        t.update(None);
        assert!(!t.is_visible());
        assert!(t.is_recently_visible());
    }
}
