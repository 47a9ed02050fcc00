#[cfg(feature = "desktop")]
pub mod commands;
pub mod controller;
pub mod devices;
pub mod loop_worker;

pub use controller::{FrameSender, FrameStreamController};
pub use devices::{CameraDevice, CameraRegistry};
