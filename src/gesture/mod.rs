pub mod classifier;
pub mod hold;
pub mod landmarks;
pub mod recognizer;

pub use classifier::{classify, GestureEvent};
pub use hold::HoldTimer;
pub use landmarks::{DetectionFrame, HandLandmarkSet, LandmarkError, LandmarkPoint};
pub use recognizer::{GestureKind, GestureRecognizer, HoldThresholds, Recognition};
