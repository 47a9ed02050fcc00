use crate::gesture::{GestureKind, Recognition};

/// Everything a camera frame can tell the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionEvent {
    FaceDetected,
    FaceNotDetected,
    /// A gesture hold just began; progress is reported once per hold.
    GestureHoldStarted(GestureKind),
    ThumbsUpHeld,
    ThreeFingersHeld,
}

impl DetectionEvent {
    pub fn face(detected: bool) -> Self {
        if detected {
            DetectionEvent::FaceDetected
        } else {
            DetectionEvent::FaceNotDetected
        }
    }

    pub fn from_recognition(recognition: Recognition) -> Option<Self> {
        match recognition {
            Recognition::HoldStarted(kind) => Some(DetectionEvent::GestureHoldStarted(kind)),
            Recognition::Fired(GestureKind::ThumbsUp) => Some(DetectionEvent::ThumbsUpHeld),
            Recognition::Fired(GestureKind::ThreeFingers) => Some(DetectionEvent::ThreeFingersHeld),
            Recognition::Idle | Recognition::Holding(_) => None,
        }
    }
}
