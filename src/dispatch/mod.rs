pub mod dispatcher;
pub mod events;

pub use dispatcher::{FrameDispatcher, StreamGestures};
pub use events::DetectionEvent;
