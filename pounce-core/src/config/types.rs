//! Sweep configuration types
//!
//! These types describe the envelope the laser dot is allowed to wander
//! in and the pacing of each sweep. Configuration is compiled into the
//! firmware as TOML and parsed at boot.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::parse::ParseError;
use crate::motion::stepper::DEFAULT_FORESHORTENING_DIVISOR;

/// Vertical span limit: straight down to the horizon
pub const MAX_VERTICAL_SPAN_DEG: u8 = 90;

/// Smallest vertical span that still leaves room to avoid the tilt midpoint
pub const MIN_VERTICAL_SPAN_DEG: u8 = 2;

/// Horizontal span limit: the servo's full travel
pub const MAX_HORIZONTAL_SPAN_DEG: u8 = 180;

/// When a sweep counts as finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TerminationPolicy {
    /// Both axes are stepped every tick until both match their targets.
    /// The axis that arrives first keeps receiving no-op steps.
    #[default]
    Conjunctive,
    /// An axis stops being stepped as soon as it reaches its target
    Independent,
}

impl TerminationPolicy {
    /// Check if an axis that is already at its target still gets stepped
    pub fn steps_settled_axis(&self) -> bool {
        matches!(self, TerminationPolicy::Conjunctive)
    }
}

/// Sweep envelope and pacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct SweepConfig {
    /// Tilt range centered on 90° (degrees)
    pub vertical_span_deg: u8,
    /// Pan range centered on 90° (degrees)
    pub horizontal_span_deg: u8,
    /// Minimum delay between ticks (ms)
    pub step_delay_base_ms: u16,
    /// Random extra delay between ticks, exclusive upper bound (ms)
    pub step_delay_jitter_ms: u16,
    /// Minimum rest after a sweep (ms)
    pub pause_base_ms: u16,
    /// Random extra rest after a sweep, exclusive upper bound (ms)
    pub pause_jitter_ms: u16,
    /// Tilt compensation: a tilt step waits `tilt_left / divisor` ms
    pub foreshortening_divisor: u16,
    /// When a sweep ends
    pub termination: TerminationPolicy,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            vertical_span_deg: 90,
            horizontal_span_deg: 120,
            step_delay_base_ms: 75,
            step_delay_jitter_ms: 50,
            pause_base_ms: 1000,
            pause_jitter_ms: 2000,
            foreshortening_divisor: DEFAULT_FORESHORTENING_DIVISOR,
            termination: TerminationPolicy::Conjunctive,
        }
    }
}

impl SweepConfig {
    /// Check the mechanical limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vertical_span_deg > MAX_VERTICAL_SPAN_DEG {
            return Err(ConfigError::VerticalSpanTooLarge(self.vertical_span_deg));
        }
        if self.vertical_span_deg < MIN_VERTICAL_SPAN_DEG {
            return Err(ConfigError::VerticalSpanTooSmall(self.vertical_span_deg));
        }
        if self.horizontal_span_deg > MAX_HORIZONTAL_SPAN_DEG {
            return Err(ConfigError::HorizontalSpanTooLarge(
                self.horizontal_span_deg,
            ));
        }
        if self.foreshortening_divisor == 0 {
            return Err(ConfigError::ZeroForeshorteningDivisor);
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Vertical span above 90°
    VerticalSpanTooLarge(u8),
    /// Vertical span below 2°
    VerticalSpanTooSmall(u8),
    /// Horizontal span above 180°
    HorizontalSpanTooLarge(u8),
    /// Foreshortening divisor of zero
    ZeroForeshorteningDivisor,
    /// Servo pulse window is empty or inverted
    InvalidPulseWindow { min_pulse_us: u16, max_pulse_us: u16 },
    /// Longest pulse does not fit in the PWM period
    PulseExceedsPeriod { max_pulse_us: u16, period_us: u16 },
    /// TOML text could not be parsed
    Parse(ParseError),
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        ConfigError::Parse(e)
    }
}
