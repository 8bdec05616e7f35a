//! Random sweep targets
//!
//! Each sweep heads for a fresh point picked uniformly inside the
//! configured envelope, at a randomized pace, followed by a randomized
//! rest. The randomness source is injected so the firmware can seed it
//! from hardware noise and tests can pin it.

use rand::Rng;

use crate::config::SweepConfig;
use crate::motion::axis::TILT_MIDPOINT_DEG;

/// Both spans are centered on the middle of the servo travel
const ENVELOPE_CENTER_DEG: i16 = 90;

/// Where to go and how fast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionTarget {
    /// Goal for the left tilt servo (the right one mirrors it)
    pub target_tilt: i16,
    /// Goal for the pan servo
    pub target_pan: i16,
    /// Delay after every tick, on top of the tilt compensation (ms)
    pub step_delay_ms: u16,
}

/// A target plus the rest that follows it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SweepPlan {
    pub target: MotionTarget,
    /// Rest after convergence (ms)
    pub pause_ms: u32,
}

/// Move a tilt goal off the mirror midpoint
///
/// At 90° both tilt servos sit at the same angle, which must never be a
/// resting position.
pub fn avoid_midpoint(tilt: i16) -> i16 {
    if tilt == TILT_MIDPOINT_DEG {
        tilt + 1
    } else {
        tilt
    }
}

/// Uniform over `0..n`, or 0 for an empty range
fn uniform<R: Rng + ?Sized>(rng: &mut R, n: u16) -> u16 {
    if n == 0 {
        0
    } else {
        rng.gen_range(0..n)
    }
}

/// Picks random sweep plans inside the configured envelope
#[derive(Debug, Clone, Copy)]
pub struct TargetSource {
    config: SweepConfig,
}

impl TargetSource {
    /// Create a target source for a (validated) sweep configuration
    pub fn new(config: SweepConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Pick the next target
    pub fn next_target<R: Rng + ?Sized>(&self, rng: &mut R) -> MotionTarget {
        let vertical = self.config.vertical_span_deg as i16;
        let horizontal = self.config.horizontal_span_deg as i16;

        let tilt = (ENVELOPE_CENTER_DEG + vertical / 2) - uniform(rng, vertical as u16) as i16;
        let pan = (ENVELOPE_CENTER_DEG + horizontal / 2) - uniform(rng, horizontal as u16) as i16;
        let step_delay_ms = self
            .config
            .step_delay_base_ms
            .saturating_add(uniform(rng, self.config.step_delay_jitter_ms));

        MotionTarget {
            target_tilt: avoid_midpoint(tilt),
            target_pan: pan,
            step_delay_ms,
        }
    }

    /// Pick the next target and the rest after it
    pub fn next_plan<R: Rng + ?Sized>(&self, rng: &mut R) -> SweepPlan {
        let target = self.next_target(rng);
        let pause_ms = self.config.pause_base_ms as u32
            + uniform(rng, self.config.pause_jitter_ms) as u32;

        SweepPlan { target, pause_ms }
    }
}
