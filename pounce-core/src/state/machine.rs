//! Sweep state machine definition
//!
//! The gimbal is either holding still between sweeps or stepping toward a
//! freshly chosen target. Everything the sweep task does is a function of
//! the current state and an event.

use super::events::SweepEvent;

/// Sweep states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SweepState {
    /// Between sweeps, holding position
    #[default]
    Idle,
    /// Stepping toward the current target
    Converging,
}

impl SweepState {
    /// Check if the steppers may run in this state
    pub fn stepping_allowed(&self) -> bool {
        matches!(self, SweepState::Converging)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: SweepEvent) -> Self {
        use SweepEvent::*;
        use SweepState::*;

        match (self, event) {
            (Idle, TargetChosen) => Converging,

            (Converging, event) if event.ends_sweep() => Idle,

            // Default: stay in current state
            _ => self,
        }
    }
}
