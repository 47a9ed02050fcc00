use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::classifier::{classify_primary, GestureEvent};
use super::hold::HoldTimer;
use super::landmarks::HandLandmarkSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GestureKind {
    ThumbsUp,
    ThreeFingers,
}

impl GestureKind {
    pub fn hold_message(&self) -> &'static str {
        match self {
            GestureKind::ThumbsUp => "Thumbs up detected, waiting...",
            GestureKind::ThreeFingers => "Three fingers detected. Hold...",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recognition {
    Idle,
    HoldStarted(GestureKind),
    Holding(GestureKind),
    Fired(GestureKind),
}

#[derive(Debug, Clone, Copy)]
pub struct HoldThresholds {
    pub thumbs_up: Duration,
    pub three_fingers: Duration,
}

impl Default for HoldThresholds {
    fn default() -> Self {
        Self {
            thumbs_up: Duration::from_millis(1500),
            three_fingers: Duration::from_millis(1200),
        }
    }
}

/// Debounced gesture recognition over the primary hand.
///
/// One [`HoldTimer`] per gesture. At most one gesture progresses per frame:
/// a three-finger pose force-clears the thumbs-up hold.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    thumbs_up: HoldTimer,
    three_fingers: HoldTimer,
}

impl GestureRecognizer {
    pub fn new(thresholds: HoldThresholds) -> Self {
        Self {
            thumbs_up: HoldTimer::new(thresholds.thumbs_up),
            three_fingers: HoldTimer::new(thresholds.three_fingers),
        }
    }

    pub fn reset(&mut self) {
        self.thumbs_up.reset();
        self.three_fingers.reset();
    }

    pub fn observe(&mut self, hand: Option<&HandLandmarkSet>, now: Instant) -> Recognition {
        match classify_primary(hand) {
            GestureEvent::ExtendedFingerCount(3) => {
                self.thumbs_up.reset();
                advance(&mut self.three_fingers, GestureKind::ThreeFingers, now)
            }
            GestureEvent::ThumbsUp => {
                self.three_fingers.reset();
                advance(&mut self.thumbs_up, GestureKind::ThumbsUp, now)
            }
            GestureEvent::None | GestureEvent::ExtendedFingerCount(_) => {
                self.reset();
                Recognition::Idle
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn is_holding(&self, kind: GestureKind) -> bool {
        match kind {
            GestureKind::ThumbsUp => self.thumbs_up.is_holding(),
            GestureKind::ThreeFingers => self.three_fingers.is_holding(),
        }
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(HoldThresholds::default())
    }
}

fn advance(hold: &mut HoldTimer, kind: GestureKind, now: Instant) -> Recognition {
    let was_holding = hold.is_holding();
    if hold.feed(true, now) {
        Recognition::Fired(kind)
    } else if was_holding {
        Recognition::Holding(kind)
    } else {
        Recognition::HoldStarted(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::classifier::fixtures::{fist, three_fingers, thumbs_up};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn thumbs_up_fires_after_hold() {
        let t0 = Instant::now();
        let mut recognizer = GestureRecognizer::default();
        let hand = thumbs_up();

        assert_eq!(
            recognizer.observe(Some(&hand), t0),
            Recognition::HoldStarted(GestureKind::ThumbsUp)
        );
        assert_eq!(
            recognizer.observe(Some(&hand), t0 + ms(1000)),
            Recognition::Holding(GestureKind::ThumbsUp)
        );
        assert_eq!(
            recognizer.observe(Some(&hand), t0 + ms(1500)),
            Recognition::Fired(GestureKind::ThumbsUp)
        );
    }

    #[test]
    fn three_fingers_fires_at_its_own_threshold() {
        let t0 = Instant::now();
        let mut recognizer = GestureRecognizer::default();
        let hand = three_fingers();

        recognizer.observe(Some(&hand), t0);
        assert_eq!(
            recognizer.observe(Some(&hand), t0 + ms(1199)),
            Recognition::Holding(GestureKind::ThreeFingers)
        );
        assert_eq!(
            recognizer.observe(Some(&hand), t0 + ms(1200)),
            Recognition::Fired(GestureKind::ThreeFingers)
        );
    }

    #[test]
    fn three_fingers_clears_thumbs_up_progress() {
        let t0 = Instant::now();
        let mut recognizer = GestureRecognizer::default();

        recognizer.observe(Some(&thumbs_up()), t0);
        assert!(recognizer.is_holding(GestureKind::ThumbsUp));

        recognizer.observe(Some(&three_fingers()), t0 + ms(700));
        assert!(!recognizer.is_holding(GestureKind::ThumbsUp));
        assert!(recognizer.is_holding(GestureKind::ThreeFingers));

        // The earlier thumbs-up time does not count toward a new hold.
        assert_eq!(
            recognizer.observe(Some(&thumbs_up()), t0 + ms(1600)),
            Recognition::HoldStarted(GestureKind::ThumbsUp)
        );
    }

    #[test]
    fn losing_the_hand_resets_both_holds() {
        let t0 = Instant::now();
        let mut recognizer = GestureRecognizer::default();

        recognizer.observe(Some(&three_fingers()), t0);
        assert_eq!(recognizer.observe(None, t0 + ms(33)), Recognition::Idle);
        assert_eq!(
            recognizer.observe(Some(&three_fingers()), t0 + ms(1300)),
            Recognition::HoldStarted(GestureKind::ThreeFingers)
        );
    }

    #[test]
    fn other_poses_are_idle() {
        let t0 = Instant::now();
        let mut recognizer = GestureRecognizer::default();
        assert_eq!(recognizer.observe(Some(&fist()), t0), Recognition::Idle);
    }
}
