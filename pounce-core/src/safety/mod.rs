//! Safety handling
//!
//! Fail-safe fault reporting: clamp, keep going, tell the caller.

pub mod fault;

pub use fault::{Fault, FaultLog};
