//! Inter-task communication channels
//!
//! Defines the static signals used for communication between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// Requests from the pause button to the sweep task
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum SweepControl {
    /// Abandon the current sweep and hold position
    Pause,
    /// Start sweeping again
    Resume,
}

/// Latest pause/resume request (checked by the sweep task every tick)
pub static SWEEP_CONTROL: Signal<CriticalSectionRawMutex, SweepControl> = Signal::new();
