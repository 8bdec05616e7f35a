//! Hardware abstraction traits
//!
//! These traits define the interface between the sweep logic
//! and hardware-specific implementations.

pub mod servo;

pub use servo::{ActuatorError, ServoActuator, ServoId, MAX_SERVO_ANGLE_DEG};
