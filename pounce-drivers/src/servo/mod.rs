//! Servo driver implementations
//!
//! - PWM hobby servos: angle mapped linearly onto a pulse window

pub mod pwm;

pub use pwm::PwmServo;
