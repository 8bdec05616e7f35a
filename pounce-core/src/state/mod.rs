//! State machine for sweep execution
//!
//! IDLE -> CONVERGING -> IDLE, driven by the sweep controller.
//! The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::SweepEvent;
pub use machine::SweepState;
