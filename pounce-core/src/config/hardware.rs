//! Hardware configuration types
//!
//! Servo pulse calibration and the top-level gimbal configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::{ConfigError, SweepConfig};

/// Hobby servo pulse calibration
///
/// Angles 0-180 map linearly onto `min_pulse_us..=max_pulse_us`, repeated
/// every `period_us`. The defaults match the common Arduino servo timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct ServoHwConfig {
    /// Pulse width at 0° (µs)
    pub min_pulse_us: u16,
    /// Pulse width at 180° (µs)
    pub max_pulse_us: u16,
    /// PWM period (µs), 20000 for 50 Hz
    pub period_us: u16,
}

impl Default for ServoHwConfig {
    fn default() -> Self {
        Self {
            min_pulse_us: 544,
            max_pulse_us: 2400,
            period_us: 20_000,
        }
    }
}

impl ServoHwConfig {
    /// Check the pulse window fits in the period
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_pulse_us >= self.max_pulse_us {
            return Err(ConfigError::InvalidPulseWindow {
                min_pulse_us: self.min_pulse_us,
                max_pulse_us: self.max_pulse_us,
            });
        }
        if self.max_pulse_us >= self.period_us {
            return Err(ConfigError::PulseExceedsPeriod {
                max_pulse_us: self.max_pulse_us,
                period_us: self.period_us,
            });
        }
        Ok(())
    }

    /// PWM frequency in Hz
    pub fn frequency_hz(&self) -> u32 {
        1_000_000 / self.period_us.max(1) as u32
    }
}

/// Complete gimbal configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct GimbalConfig {
    /// Sweep envelope and pacing
    pub sweep: SweepConfig,
    /// Servo pulse calibration (shared by all three servos)
    pub servo: ServoHwConfig,
}

impl GimbalConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sweep.validate()?;
        self.servo.validate()
    }
}
