//! Debounced face presence.
//!
//! Presence is gained on the first face frame. Losing it takes a continuous
//! absence longer than the grace period; a face seen inside the grace window
//! cancels the pending absence without any event.

use std::time::{Duration, Instant};

pub const DEFAULT_ABSENCE_GRACE: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEdge {
    Gained,
    Lost,
}

#[derive(Debug, Clone)]
pub struct PresenceTracker {
    is_present: bool,
    absent_since: Option<Instant>,
    absence_grace: Duration,
}

impl PresenceTracker {
    pub fn new(absence_grace: Duration) -> Self {
        Self {
            is_present: false,
            absent_since: None,
            absence_grace,
        }
    }

    pub fn is_present(&self) -> bool {
        self.is_present
    }

    pub fn absent_since(&self) -> Option<Instant> {
        self.absent_since
    }

    /// Forgets a pending absence without changing presence. Used when frames
    /// stop being observed, so the gap never counts as absence.
    pub fn clear_pending_absence(&mut self) {
        self.absent_since = None;
    }

    pub fn on_face_frame(&mut self, detected: bool, now: Instant) -> Option<PresenceEdge> {
        if detected {
            self.absent_since = None;
            if self.is_present {
                return None;
            }
            self.is_present = true;
            return Some(PresenceEdge::Gained);
        }

        if !self.is_present {
            return None;
        }

        let since = *self.absent_since.get_or_insert(now);
        if now.saturating_duration_since(since) > self.absence_grace {
            self.is_present = false;
            self.absent_since = None;
            return Some(PresenceEdge::Lost);
        }
        None
    }
}

impl Default for PresenceTracker {
    fn default() -> Self {
        Self::new(DEFAULT_ABSENCE_GRACE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn present_tracker(t0: Instant) -> PresenceTracker {
        let mut tracker = PresenceTracker::default();
        assert_eq!(tracker.on_face_frame(true, t0), Some(PresenceEdge::Gained));
        tracker
    }

    #[test]
    fn first_face_frame_gains_presence_immediately() {
        let t0 = Instant::now();
        let mut tracker = PresenceTracker::default();
        assert!(!tracker.is_present());
        assert_eq!(tracker.on_face_frame(true, t0), Some(PresenceEdge::Gained));
        assert_eq!(tracker.on_face_frame(true, t0 + ms(33)), None);
        assert!(tracker.is_present());
    }

    #[test]
    fn short_dropout_is_cancelled_silently() {
        let t0 = Instant::now();
        let mut tracker = present_tracker(t0);

        let start = t0 + ms(100);
        for step in (0..=4999).step_by(33) {
            assert_eq!(tracker.on_face_frame(false, start + ms(step)), None);
            assert!(tracker.is_present());
        }
        assert_eq!(tracker.on_face_frame(false, start + ms(4999)), None);
        assert_eq!(tracker.on_face_frame(true, start + ms(5000)), None);
        assert!(tracker.is_present());
        assert!(tracker.absent_since().is_none());
    }

    #[test]
    fn absence_past_grace_fires_lost_once() {
        let t0 = Instant::now();
        let mut tracker = present_tracker(t0);

        let start = t0 + ms(100);
        assert_eq!(tracker.on_face_frame(false, start), None);
        assert_eq!(tracker.on_face_frame(false, start + ms(5000)), None);
        assert_eq!(
            tracker.on_face_frame(false, start + ms(5001)),
            Some(PresenceEdge::Lost)
        );
        assert!(!tracker.is_present());
        assert_eq!(tracker.on_face_frame(false, start + ms(9000)), None);
        assert_eq!(tracker.on_face_frame(false, start + ms(20000)), None);
    }

    #[test]
    fn absence_start_is_not_overwritten() {
        let t0 = Instant::now();
        let mut tracker = present_tracker(t0);

        tracker.on_face_frame(false, t0 + ms(10));
        tracker.on_face_frame(false, t0 + ms(3000));
        assert_eq!(tracker.absent_since(), Some(t0 + ms(10)));
    }

    #[test]
    fn returning_after_loss_gains_again() {
        let t0 = Instant::now();
        let mut tracker = present_tracker(t0);
        tracker.on_face_frame(false, t0 + ms(1));
        tracker.on_face_frame(false, t0 + ms(6000));
        assert_eq!(
            tracker.on_face_frame(true, t0 + ms(7000)),
            Some(PresenceEdge::Gained)
        );
    }

    #[test]
    fn cleared_absence_restarts_the_grace_window() {
        let t0 = Instant::now();
        let mut tracker = present_tracker(t0);
        tracker.on_face_frame(false, t0 + ms(10));

        tracker.clear_pending_absence();
        assert!(tracker.is_present());
        assert_eq!(tracker.on_face_frame(false, t0 + ms(600_000)), None);
        assert_eq!(tracker.absent_since(), Some(t0 + ms(600_000)));
        assert_eq!(
            tracker.on_face_frame(false, t0 + ms(605_001)),
            Some(PresenceEdge::Lost)
        );
    }

    #[test]
    fn absence_before_first_face_is_ignored() {
        let t0 = Instant::now();
        let mut tracker = PresenceTracker::default();
        assert_eq!(tracker.on_face_frame(false, t0), None);
        assert_eq!(tracker.on_face_frame(false, t0 + ms(60_000)), None);
        assert!(tracker.absent_since().is_none());
    }
}
