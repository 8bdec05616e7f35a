//! Events that trigger sweep state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SweepEvent {
    /// A new target was handed to the controller
    TargetChosen,
    /// The termination policy reports both axes at target
    Converged,
    /// The sweep was abandoned before converging (pause requested)
    Cancelled,
}

impl SweepEvent {
    /// Check if this event ends a sweep
    pub fn ends_sweep(&self) -> bool {
        matches!(self, SweepEvent::Converged | SweepEvent::Cancelled)
    }
}
