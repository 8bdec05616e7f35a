//! Host-side doubles for servos and delays

use embedded_hal_async::delay::DelayNs;

use crate::traits::{ActuatorError, ServoActuator};

/// Servo that remembers what it was told
#[derive(Debug, Default)]
pub struct MockServo {
    pub angle: Option<u8>,
    pub writes: u32,
    pub fail_writes: bool,
}

impl MockServo {
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Default::default()
        }
    }
}

impl ServoActuator for MockServo {
    fn write_angle(&mut self, degrees: u8) -> Result<(), ActuatorError> {
        self.writes += 1;
        if self.fail_writes {
            return Err(ActuatorError::Write);
        }
        self.angle = Some(degrees);
        Ok(())
    }

    fn angle(&self) -> Option<u8> {
        self.angle
    }
}

/// Delay that returns immediately and records what was asked
#[derive(Debug, Default)]
pub struct MockDelay {
    pub total_ms: u64,
    pub calls: u32,
    pub last_ms: Option<u32>,
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.total_ms += ms as u64;
        self.calls += 1;
        self.last_ms = Some(ms);
    }
}
