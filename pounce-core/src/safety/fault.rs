//! Fault reporting
//!
//! The gimbal runs unattended with no supervisor to restart it, so nothing
//! in the sweep path is allowed to fail hard. Problems are clamped or
//! skipped on the spot and reported as [`Fault`] values for the firmware to
//! log.

use heapless::Vec;

use crate::motion::Axis;
use crate::traits::{ActuatorError, ServoId};

/// A non-fatal fault detected while positioning the gimbal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// A target or intermediate angle fell outside 0-180 and was clamped
    RangeViolation {
        axis: Axis,
        requested: i32,
        clamped: i16,
    },
    /// A tilt target sat on the mirror midpoint and was moved off it
    MirrorLock { requested: i16, adjusted: i16 },
    /// The actuator reported a failed write; the commanded angle is kept
    ActuatorWriteFailure {
        servo: ServoId,
        angle: u8,
        error: ActuatorError,
    },
}

impl Fault {
    /// Check if this fault came from an actuator write
    pub fn is_actuator_fault(&self) -> bool {
        matches!(self, Fault::ActuatorWriteFailure { .. })
    }

    /// Check if this fault is a clamped angle
    pub fn is_range_violation(&self) -> bool {
        matches!(self, Fault::RangeViolation { .. })
    }
}

/// Bounded fault list
///
/// Keeps the first `N` faults and counts the rest.
#[derive(Debug, Clone, Default)]
pub struct FaultLog<const N: usize> {
    faults: Vec<Fault, N>,
    dropped: u16,
}

impl<const N: usize> FaultLog<N> {
    /// Create an empty fault log
    pub const fn new() -> Self {
        Self {
            faults: Vec::new(),
            dropped: 0,
        }
    }

    /// Record a fault
    pub fn push(&mut self, fault: Fault) {
        if self.faults.push(fault).is_err() {
            self.dropped = self.dropped.saturating_add(1);
        }
    }

    /// Record a fault if there is one
    pub fn record(&mut self, fault: Option<Fault>) {
        if let Some(fault) = fault {
            self.push(fault);
        }
    }

    /// Move every fault from another log into this one
    pub fn absorb<const M: usize>(&mut self, other: &FaultLog<M>) {
        for fault in other.iter() {
            self.push(*fault);
        }
        self.dropped = self.dropped.saturating_add(other.dropped);
    }

    /// Iterate over the retained faults
    pub fn iter(&self) -> impl Iterator<Item = &Fault> {
        self.faults.iter()
    }

    /// Number of retained faults
    pub fn len(&self) -> usize {
        self.faults.len()
    }

    /// Check if no fault was recorded (retained or dropped)
    pub fn is_empty(&self) -> bool {
        self.faults.is_empty() && self.dropped == 0
    }

    /// Number of faults that did not fit
    pub fn dropped(&self) -> u16 {
        self.dropped
    }

    /// Total number of faults recorded, retained or not
    pub fn total(&self) -> usize {
        self.faults.len() + self.dropped as usize
    }
}
