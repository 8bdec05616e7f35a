//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod button;
pub mod sweep;

pub use button::button_task;
pub use sweep::{sweep_task, GimbalController, Servo};
