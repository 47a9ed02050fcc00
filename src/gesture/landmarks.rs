use serde::{Deserialize, Serialize};

/// Number of keypoints the hand model reports per hand.
pub const HAND_LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_IP: usize = 2;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// (tip, base) pairs for thumb, index, middle, ring, pinky.
pub const FINGER_JOINTS: [(usize, usize); 5] = [
    (THUMB_TIP, THUMB_IP),
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Normalized image coordinates, origin at the top-left of the frame.
/// `y` grows downward, so a smaller `y` is higher on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkPoint {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl LandmarkPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LandmarkError {
    #[error("hand landmark set must have 21 points, got {0}")]
    WrongPointCount(usize),

    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// The 21 keypoints of one detected hand.
///
/// Construction validates the point count, so indexing by the joint constants
/// above can never go out of bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LandmarkPoint>", into = "Vec<LandmarkPoint>")]
pub struct HandLandmarkSet {
    points: Vec<LandmarkPoint>,
}

impl HandLandmarkSet {
    pub fn new(points: Vec<LandmarkPoint>) -> Result<Self, LandmarkError> {
        if points.len() != HAND_LANDMARK_COUNT {
            return Err(LandmarkError::WrongPointCount(points.len()));
        }
        if let Some(index) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite() || !p.z.is_finite())
        {
            return Err(LandmarkError::NonFinite { index });
        }
        Ok(Self { points })
    }

    pub fn point(&self, index: usize) -> LandmarkPoint {
        self.points[index]
    }
}

impl TryFrom<Vec<LandmarkPoint>> for HandLandmarkSet {
    type Error = LandmarkError;

    fn try_from(points: Vec<LandmarkPoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<HandLandmarkSet> for Vec<LandmarkPoint> {
    fn from(set: HandLandmarkSet) -> Self {
        set.points
    }
}

/// One camera frame's worth of detector output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionFrame {
    pub face_detected: bool,
    #[serde(default)]
    pub hands: Vec<HandLandmarkSet>,
}

impl DetectionFrame {
    /// Only the first detected hand takes part in gesture recognition.
    pub fn primary_hand(&self) -> Option<&HandLandmarkSet> {
        self.hands.first()
    }
}
