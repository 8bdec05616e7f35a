//! Sweep planning and execution
//!
//! - [`TargetSource`]: picks random targets inside the configured envelope
//! - [`SweepController`]: steps the gimbal toward a target, tick by tick

pub mod controller;
pub mod target;

pub use controller::{
    SweepController, SweepFaults, SweepOutcome, SweepReport, TickReport, SWEEP_FAULT_CAPACITY,
};
pub use target::{avoid_midpoint, MotionTarget, SweepPlan, TargetSource};
