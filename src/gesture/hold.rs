use std::time::{Duration, Instant};

/// Fires once a condition has been continuously true for `required`.
///
/// A single false frame discards the hold. After firing the timer starts over,
/// so the condition has to be observed again from scratch to fire a second time.
#[derive(Debug, Clone)]
pub struct HoldTimer {
    started_at: Option<Instant>,
    required: Duration,
}

impl HoldTimer {
    pub fn new(required: Duration) -> Self {
        Self {
            started_at: None,
            required,
        }
    }

    pub fn is_holding(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn reset(&mut self) {
        self.started_at = None;
    }

    /// Returns `true` on the frame the hold completes.
    pub fn feed(&mut self, active: bool, now: Instant) -> bool {
        if !active {
            self.started_at = None;
            return false;
        }

        match self.started_at {
            None => {
                self.started_at = Some(now);
                false
            }
            Some(start) if now.saturating_duration_since(start) >= self.required => {
                self.started_at = None;
                true
            }
            Some(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn never_fires_before_threshold() {
        let t0 = Instant::now();
        let mut hold = HoldTimer::new(ms(1500));
        for step in (0..1500).step_by(33) {
            assert!(!hold.feed(true, t0 + ms(step)), "fired early at {step}ms");
        }
        assert!(hold.is_holding());
    }

    #[test]
    fn fires_exactly_once_then_restarts() {
        let t0 = Instant::now();
        let mut hold = HoldTimer::new(ms(1500));
        assert!(!hold.feed(true, t0));
        assert!(!hold.feed(true, t0 + ms(1499)));
        assert!(hold.feed(true, t0 + ms(1500)));

        // Still held: a new hold begins on this frame instead of firing again.
        assert!(!hold.feed(true, t0 + ms(1533)));
        assert!(!hold.feed(true, t0 + ms(2000)));
        assert!(hold.feed(true, t0 + ms(3033)));
    }

    #[test]
    fn first_frame_only_arms_the_timer() {
        let t0 = Instant::now();
        let mut hold = HoldTimer::new(Duration::ZERO);
        assert!(!hold.feed(true, t0));
        assert!(hold.feed(true, t0));
    }

    #[test]
    fn single_dropped_frame_restarts_the_hold() {
        let t0 = Instant::now();
        let mut hold = HoldTimer::new(ms(1400));

        assert!(!hold.feed(true, t0));
        assert!(!hold.feed(true, t0 + ms(1000)));
        assert!(!hold.feed(false, t0 + ms(1033)));
        assert!(!hold.is_holding());
        assert!(!hold.feed(true, t0 + ms(1066)));
        assert!(!hold.feed(true, t0 + ms(2066)));
    }

    #[test]
    fn reset_clears_progress() {
        let t0 = Instant::now();
        let mut hold = HoldTimer::new(ms(100));
        hold.feed(true, t0);
        hold.reset();
        assert!(!hold.feed(true, t0 + ms(200)));
    }
}
