//! Board-agnostic core logic for the laser gimbal firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Servo actuator trait
//! - Axis state and the per-degree tilt/pan steppers
//! - Sweep state machine and controller
//! - Random target selection
//! - Fault reporting
//! - Configuration types and parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod motion;
pub mod safety;
pub mod state;
pub mod sweep;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;
