//! Gimbal motion
//!
//! Commanded axis state and the one-degree-per-call steppers that move it.

pub mod axis;
pub mod stepper;

pub use axis::{clamp_angle, Axis, AxisState};
pub use stepper::{Foreshortening, Gimbal, Motion, StepReport, Stepper};
