#[cfg(feature = "desktop")]
pub mod commands;
pub mod controller;
pub mod state;

pub use controller::TimerController;
pub use state::{
    format_clock, SessionDurations, SessionMode, SessionPhase, SessionSnapshot, SessionState,
    Trigger,
};
