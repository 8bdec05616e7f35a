//! Servo actuator trait
//!
//! This trait abstracts over angle-commanded hobby servos. The core only
//! ever asks for an absolute angle; how that becomes a pulse train is the
//! driver's business.

/// Largest angle a servo accepts
pub const MAX_SERVO_ANGLE_DEG: u8 = 180;

/// One of the three gimbal servos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServoId {
    /// Left tilt servo
    TiltLeft,
    /// Center pan servo
    Pan,
    /// Right tilt servo, mounted as the mirror of the left one
    TiltRight,
}

/// Errors that can occur when commanding a servo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// Requested angle is outside 0-180 degrees
    OutOfRange,
    /// The PWM peripheral rejected the new duty cycle
    Write,
}

/// Trait for angle-writable actuators
///
/// Writes are fire-and-forget: the servo moves on its own internal timing
/// and there is no position feedback.
pub trait ServoActuator {
    /// Command the servo to an absolute angle in degrees (0-180)
    fn write_angle(&mut self, degrees: u8) -> Result<(), ActuatorError>;

    /// Last angle successfully written, if any
    fn angle(&self) -> Option<u8>;
}

impl<T: ServoActuator + ?Sized> ServoActuator for &mut T {
    fn write_angle(&mut self, degrees: u8) -> Result<(), ActuatorError> {
        (**self).write_angle(degrees)
    }

    fn angle(&self) -> Option<u8> {
        (**self).angle()
    }
}
