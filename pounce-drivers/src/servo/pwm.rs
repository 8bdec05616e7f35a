//! Hobby servo on a PWM channel
//!
//! The servo reads the width of a pulse repeated every 20 ms. 0° is the
//! shortest pulse of the calibrated window, 180° the longest, and angles
//! in between map linearly.
//!
//! # Usage
//!
//! The channel's counter period should match `period_us` (50 Hz). The
//! duty is set as a fraction of the period, so the counter resolution
//! does not matter.
//!
//! ```ignore
//! let mut servo = PwmServo::new(channel, ServoHwConfig::default());
//! servo.write_angle(90)?; // 1472 µs pulse
//! ```

use embedded_hal::pwm::SetDutyCycle;
use pounce_core::config::ServoHwConfig;
use pounce_core::traits::{ActuatorError, ServoActuator, MAX_SERVO_ANGLE_DEG};

/// Servo driven by one PWM output
pub struct PwmServo<P> {
    pwm: P,
    config: ServoHwConfig,
    /// Last angle that was written successfully
    angle: Option<u8>,
}

impl<P: SetDutyCycle> PwmServo<P> {
    /// Create a servo driver
    ///
    /// The output is left untouched until the first write.
    pub fn new(pwm: P, config: ServoHwConfig) -> Self {
        Self {
            pwm,
            config,
            angle: None,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ServoHwConfig {
        &self.config
    }

    /// Pulse width for an angle, in µs
    ///
    /// Angles above 180 are treated as 180.
    pub fn pulse_width_us(&self, degrees: u8) -> u16 {
        let degrees = degrees.min(MAX_SERVO_ANGLE_DEG) as u32;
        let min = self.config.min_pulse_us as u32;
        let span = self.config.max_pulse_us.saturating_sub(self.config.min_pulse_us) as u32;
        (min + span * degrees / MAX_SERVO_ANGLE_DEG as u32) as u16
    }

    /// Release the PWM channel
    pub fn release(self) -> P {
        self.pwm
    }
}

impl<P: SetDutyCycle> ServoActuator for PwmServo<P> {
    fn write_angle(&mut self, degrees: u8) -> Result<(), ActuatorError> {
        if degrees > MAX_SERVO_ANGLE_DEG {
            return Err(ActuatorError::OutOfRange);
        }

        let pulse = self.pulse_width_us(degrees);
        self.pwm
            .set_duty_cycle_fraction(pulse, self.config.period_us)
            .map_err(|_| ActuatorError::Write)?;
        self.angle = Some(degrees);
        Ok(())
    }

    fn angle(&self) -> Option<u8> {
        self.angle
    }
}
