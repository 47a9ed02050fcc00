//! Per-frame hand pose classification.
//!
//! Pure functions over a single [`HandLandmarkSet`]. Image `y` grows downward,
//! so a fingertip *above* its base joint has the smaller `y`. A finger counts as
//! curled when its tip sits below (greater `y` than) its PIP joint.

use serde::Serialize;

use super::landmarks::{
    HandLandmarkSet, FINGER_JOINTS, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP,
    PINKY_TIP, RING_PIP, RING_TIP, THUMB_IP, THUMB_TIP,
};

/// Exclusive bounds (degrees) for the knuckle-to-tip thumb direction.
/// Screen space: -90 is straight up.
const THUMB_UP_MIN_DEG: f32 = -135.0;
const THUMB_UP_MAX_DEG: f32 = -45.0;

const CURL_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "count", rename_all = "camelCase")]
pub enum GestureEvent {
    None,
    ThumbsUp,
    ExtendedFingerCount(u8),
}

/// Fingers (thumb included) whose tip is above their base joint. 0..=5.
pub fn count_extended_fingers(hand: &HandLandmarkSet) -> u8 {
    FINGER_JOINTS
        .iter()
        .filter(|(tip, base)| hand.point(*tip).y < hand.point(*base).y)
        .count() as u8
}

/// Angle of the thumb from its IP joint to its tip, in degrees.
pub fn thumb_angle_deg(hand: &HandLandmarkSet) -> f32 {
    let tip = hand.point(THUMB_TIP);
    let knuckle = hand.point(THUMB_IP);
    (tip.y - knuckle.y).atan2(tip.x - knuckle.x).to_degrees()
}

pub fn is_thumbs_up(hand: &HandLandmarkSet) -> bool {
    let thumb_extended = hand.point(THUMB_TIP).y < hand.point(THUMB_IP).y;
    let fingers_curled = CURL_JOINTS
        .iter()
        .all(|(tip, base)| hand.point(*tip).y > hand.point(*base).y);
    let angle = thumb_angle_deg(hand);
    let pointing_up = angle > THUMB_UP_MIN_DEG && angle < THUMB_UP_MAX_DEG;

    thumb_extended && fingers_curled && pointing_up
}

/// Exactly three extended fingers wins over thumbs-up.
pub fn classify(hand: &HandLandmarkSet) -> GestureEvent {
    let extended = count_extended_fingers(hand);
    if extended == 3 {
        GestureEvent::ExtendedFingerCount(3)
    } else if is_thumbs_up(hand) {
        GestureEvent::ThumbsUp
    } else {
        GestureEvent::ExtendedFingerCount(extended)
    }
}

/// Classifies the primary hand of a frame; no hand means no gesture.
pub fn classify_primary(hand: Option<&HandLandmarkSet>) -> GestureEvent {
    hand.map(classify).unwrap_or(GestureEvent::None)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::gesture::landmarks::{
        HandLandmarkSet, LandmarkPoint, HAND_LANDMARK_COUNT, INDEX_PIP, INDEX_TIP, MIDDLE_PIP,
        MIDDLE_TIP, PINKY_PIP, PINKY_TIP, RING_PIP, RING_TIP, THUMB_IP, THUMB_TIP, WRIST,
    };

    fn base_hand() -> Vec<LandmarkPoint> {
        let mut points = vec![LandmarkPoint::new(0.5, 0.6); HAND_LANDMARK_COUNT];
        points[WRIST] = LandmarkPoint::new(0.5, 0.8);
        points[THUMB_IP] = LandmarkPoint::new(0.40, 0.60);
        points[INDEX_PIP] = LandmarkPoint::new(0.45, 0.50);
        points[MIDDLE_PIP] = LandmarkPoint::new(0.50, 0.50);
        points[RING_PIP] = LandmarkPoint::new(0.55, 0.50);
        points[PINKY_PIP] = LandmarkPoint::new(0.60, 0.52);
        points
    }

    fn set_tip(points: &mut [LandmarkPoint], tip: usize, base: usize, extended: bool) {
        let base_point = points[base];
        let dy = if extended { -0.15 } else { 0.08 };
        points[tip] = LandmarkPoint::new(base_point.x, base_point.y + dy);
    }

    /// Hand with the given fingers (thumb, index, middle, ring, pinky) raised.
    pub fn hand(extended: [bool; 5]) -> HandLandmarkSet {
        let mut points = base_hand();
        let joints = [
            (THUMB_TIP, THUMB_IP),
            (INDEX_TIP, INDEX_PIP),
            (MIDDLE_TIP, MIDDLE_PIP),
            (RING_TIP, RING_PIP),
            (PINKY_TIP, PINKY_PIP),
        ];
        for ((tip, base), up) in joints.into_iter().zip(extended) {
            set_tip(&mut points, tip, base, up);
        }
        HandLandmarkSet::new(points).unwrap()
    }

    pub fn thumbs_up() -> HandLandmarkSet {
        hand([true, false, false, false, false])
    }

    pub fn three_fingers() -> HandLandmarkSet {
        hand([false, true, true, true, false])
    }

    pub fn fist() -> HandLandmarkSet {
        hand([false; 5])
    }

    /// Thumb raised but tilted `angle_deg` from the IP joint.
    pub fn thumb_at_angle(angle_deg: f32) -> HandLandmarkSet {
        let mut points = base_hand();
        for (tip, base) in [
            (INDEX_TIP, INDEX_PIP),
            (MIDDLE_TIP, MIDDLE_PIP),
            (RING_TIP, RING_PIP),
            (PINKY_TIP, PINKY_PIP),
        ] {
            set_tip(&mut points, tip, base, false);
        }
        let knuckle = points[THUMB_IP];
        let radians = angle_deg.to_radians();
        points[THUMB_TIP] = LandmarkPoint::new(
            knuckle.x + 0.12 * radians.cos(),
            knuckle.y + 0.12 * radians.sin(),
        );
        HandLandmarkSet::new(points).unwrap()
    }
}
