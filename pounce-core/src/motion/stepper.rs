//! Per-degree motion primitives
//!
//! Each call moves an axis exactly one degree toward its target and
//! commits the result to the servos. Callers keep calling until the axis
//! converges; a call at the target changes nothing.
//!
//! The tilt step waits before committing. Near the floor-pointing end of
//! the tilt range one degree of servo travel moves the laser dot a long way
//! across the floor, so the wait grows with the tilt angle to keep the
//! dot's ground speed roughly even.
//!
//! # Usage
//!
//! ```ignore
//! let mut stepper = Stepper::new(gimbal, Delay, Foreshortening::default());
//! let mut state = AxisState::home();
//!
//! while state.tilt_left() != target {
//!     let report = stepper.step_tilt(&mut state, target).await;
//! }
//! ```

use core::cmp::Ordering;

use embedded_hal_async::delay::DelayNs;

use super::axis::{AxisState, MAX_ANGLE_DEG, MIN_ANGLE_DEG};
use crate::safety::{Fault, FaultLog};
use crate::traits::{ServoActuator, ServoId};

/// Default divisor for the tilt compensation delay
pub const DEFAULT_FORESHORTENING_DIVISOR: u16 = 4;

/// Faults a single step can raise: one clamp plus two servo writes
pub const STEP_FAULT_CAPACITY: usize = 3;

/// Faults raised by one stepper call
pub type StepFaults = FaultLog<STEP_FAULT_CAPACITY>;

/// Tilt speed correction
///
/// Delay before committing a tilt step is `tilt_left / divisor` ms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Foreshortening {
    divisor: u16,
}

impl Default for Foreshortening {
    fn default() -> Self {
        Self::new(DEFAULT_FORESHORTENING_DIVISOR)
    }
}

impl Foreshortening {
    /// Create a compensation with the given divisor (0 is treated as 1)
    pub const fn new(divisor: u16) -> Self {
        Self {
            divisor: if divisor == 0 { 1 } else { divisor },
        }
    }

    /// Divisor in use
    pub fn divisor(&self) -> u16 {
        self.divisor
    }

    /// Delay in milliseconds for a tilt step committing `tilt_left`
    pub fn delay_ms(&self, tilt_left: i16) -> u32 {
        tilt_left.max(0) as u32 / self.divisor as u32
    }
}

/// What a stepper call did to its axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motion {
    /// Axis was already at the target
    Held(i16),
    /// Axis moved one degree
    Advanced { from: i16, to: i16 },
}

impl Motion {
    fn between(from: i16, to: i16) -> Self {
        if from == to {
            Motion::Held(to)
        } else {
            Motion::Advanced { from, to }
        }
    }

    /// Angle after the step
    pub fn angle(&self) -> i16 {
        match *self {
            Motion::Held(angle) => angle,
            Motion::Advanced { to, .. } => to,
        }
    }

    /// Check if the axis moved
    pub fn is_advanced(&self) -> bool {
        matches!(self, Motion::Advanced { .. })
    }
}

/// Result of one stepper call
#[derive(Debug, Clone)]
pub struct StepReport {
    pub motion: Motion,
    pub faults: StepFaults,
}

/// The three servos of the gimbal
pub struct Gimbal<L, P, R> {
    pub tilt_left: L,
    pub pan: P,
    pub tilt_right: R,
}

impl<L, P, R> Gimbal<L, P, R> {
    /// Bundle the three servos
    pub fn new(tilt_left: L, pan: P, tilt_right: R) -> Self {
        Self {
            tilt_left,
            pan,
            tilt_right,
        }
    }
}

/// Next angle one degree closer to `goal`
pub fn next_angle(current: i16, goal: i16) -> i16 {
    match current.cmp(&goal) {
        Ordering::Greater => current - 1,
        Ordering::Less => current + 1,
        Ordering::Equal => current,
    }
}

/// Write an angle, turning a driver error into a fault
fn commit<S: ServoActuator>(servo: &mut S, id: ServoId, angle: i16) -> Option<Fault> {
    let angle = angle.clamp(MIN_ANGLE_DEG, MAX_ANGLE_DEG) as u8;
    servo
        .write_angle(angle)
        .err()
        .map(|error| Fault::ActuatorWriteFailure {
            servo: id,
            angle,
            error,
        })
}

/// Tilt and pan steppers
///
/// Owns the servos and the delay source. The axis state is not owned
/// here; it is passed in by the sweep controller on every call.
pub struct Stepper<L, P, R, D> {
    gimbal: Gimbal<L, P, R>,
    delay: D,
    foreshortening: Foreshortening,
}

impl<L, P, R, D> Stepper<L, P, R, D>
where
    L: ServoActuator,
    P: ServoActuator,
    R: ServoActuator,
    D: DelayNs,
{
    /// Create a stepper over the given servos
    pub fn new(gimbal: Gimbal<L, P, R>, delay: D, foreshortening: Foreshortening) -> Self {
        Self {
            gimbal,
            delay,
            foreshortening,
        }
    }

    /// Tilt speed correction in use
    pub fn foreshortening(&self) -> Foreshortening {
        self.foreshortening
    }

    /// Access the servos
    pub fn gimbal(&self) -> &Gimbal<L, P, R> {
        &self.gimbal
    }

    /// Release the servos and delay
    pub fn into_parts(self) -> (Gimbal<L, P, R>, D) {
        (self.gimbal, self.delay)
    }

    /// Move the tilt pair one degree toward `target_tilt`
    ///
    /// Waits the foreshortening delay for the new angle, then writes the
    /// left and right tilt servos before returning.
    pub async fn step_tilt(&mut self, state: &mut AxisState, target_tilt: i16) -> StepReport {
        let mut faults = StepFaults::new();

        let from = state.tilt_left();
        faults.record(state.set_tilt_left(next_angle(from, target_tilt) as i32));
        let to = state.tilt_left();

        self.delay.delay_ms(self.foreshortening.delay_ms(to)).await;

        faults.record(commit(&mut self.gimbal.tilt_left, ServoId::TiltLeft, to));
        faults.record(commit(
            &mut self.gimbal.tilt_right,
            ServoId::TiltRight,
            state.tilt_right(),
        ));

        StepReport {
            motion: Motion::between(from, to),
            faults,
        }
    }

    /// Move the pan servo one degree toward `target_pan`
    pub fn step_pan(&mut self, state: &mut AxisState, target_pan: i16) -> StepReport {
        let mut faults = StepFaults::new();

        let from = state.pan_center();
        faults.record(state.set_pan_center(next_angle(from, target_pan) as i32));
        let to = state.pan_center();

        faults.record(commit(&mut self.gimbal.pan, ServoId::Pan, to));

        StepReport {
            motion: Motion::between(from, to),
            faults,
        }
    }

    /// Write all three servos to the current state without moving it
    pub fn commit_all(&mut self, state: &AxisState) -> StepFaults {
        let mut faults = StepFaults::new();
        faults.record(commit(
            &mut self.gimbal.tilt_left,
            ServoId::TiltLeft,
            state.tilt_left(),
        ));
        faults.record(commit(&mut self.gimbal.pan, ServoId::Pan, state.pan_center()));
        faults.record(commit(
            &mut self.gimbal.tilt_right,
            ServoId::TiltRight,
            state.tilt_right(),
        ));
        faults
    }

    /// Block for `ms` milliseconds on the stepper's delay source
    pub async fn wait_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::axis::MIRROR_SUM_DEG;
    use crate::testing::{MockDelay, MockServo};
    use embassy_futures::block_on;
    use proptest::prelude::*;

    type TestStepper = Stepper<MockServo, MockServo, MockServo, MockDelay>;

    fn stepper() -> TestStepper {
        Stepper::new(
            Gimbal::new(MockServo::default(), MockServo::default(), MockServo::default()),
            MockDelay::default(),
            Foreshortening::default(),
        )
    }

    fn state_at(tilt_left: i32, pan: i32) -> AxisState {
        let mut state = AxisState::home();
        state.set_tilt_left(tilt_left);
        state.set_pan_center(pan);
        state
    }

    #[test]
    fn test_next_angle() {
        assert_eq!(next_angle(10, 20), 11);
        assert_eq!(next_angle(20, 10), 19);
        assert_eq!(next_angle(15, 15), 15);
    }

    #[test]
    fn test_foreshortening_delay() {
        let comp = Foreshortening::default();
        assert_eq!(comp.delay_ms(135), 33);
        assert_eq!(comp.delay_ms(90), 22);
        assert_eq!(comp.delay_ms(3), 0);
        assert_eq!(comp.delay_ms(-10), 0);

        // Zero divisor must not divide by zero
        assert_eq!(Foreshortening::new(0).divisor(), 1);
        assert_eq!(Foreshortening::new(0).delay_ms(40), 40);
    }

    #[test]
    fn test_tilt_down_from_home_to_midpoint() {
        let mut stepper = stepper();
        let mut state = AxisState::home();

        for call in 1..=45 {
            let report = block_on(stepper.step_tilt(&mut state, 90));
            assert_eq!(
                report.motion,
                Motion::Advanced {
                    from: 135 - call + 1,
                    to: 135 - call
                }
            );
            assert!(report.faults.is_empty());
        }

        assert_eq!(state.tilt_left(), 90);
        assert_eq!(state.tilt_right(), 90);
        assert!(state.is_mirror_locked());
    }

    #[test]
    fn test_tilt_step_commits_both_servos() {
        let mut stepper = stepper();
        let mut state = AxisState::home();

        block_on(stepper.step_tilt(&mut state, 140));

        let gimbal = stepper.gimbal();
        assert_eq!(gimbal.tilt_left.angle, Some(136));
        assert_eq!(gimbal.tilt_right.angle, Some(44));
        assert_eq!(gimbal.pan.writes, 0);
    }

    #[test]
    fn test_tilt_delay_uses_committed_angle() {
        let mut stepper = stepper();
        let mut state = state_at(101, 90);

        block_on(stepper.step_tilt(&mut state, 50));
        let (_, delay) = stepper.into_parts();

        assert_eq!(delay.calls, 1);
        assert_eq!(delay.last_ms, Some(100 / 4));
    }

    #[test]
    fn test_pan_has_no_delay() {
        let mut stepper = stepper();
        let mut state = AxisState::home();

        stepper.step_pan(&mut state, 30);
        let (gimbal, delay) = stepper.into_parts();

        assert_eq!(delay.calls, 0);
        assert_eq!(gimbal.pan.angle, Some(89));
        assert_eq!(gimbal.tilt_left.writes, 0);
    }

    #[test]
    fn test_pan_from_center_to_thirty() {
        let mut stepper = stepper();
        let mut state = AxisState::home();
        let mut previous = state.pan_center();

        for _ in 0..60 {
            let report = stepper.step_pan(&mut state, 30);
            assert!(report.motion.is_advanced());
            assert_eq!(state.pan_center(), previous - 1);
            previous = state.pan_center();
        }

        assert_eq!(state.pan_center(), 30);
        assert_eq!(stepper.step_pan(&mut state, 30).motion, Motion::Held(30));
    }

    #[test]
    fn test_step_at_target_is_idempotent() {
        let mut stepper = stepper();
        let mut state = state_at(100, 45);
        let before = state;

        let tilt = block_on(stepper.step_tilt(&mut state, 100));
        let pan = stepper.step_pan(&mut state, 45);

        assert_eq!(state, before);
        assert_eq!(tilt.motion, Motion::Held(100));
        assert_eq!(pan.motion, Motion::Held(45));
    }

    #[test]
    fn test_out_of_range_target_is_clamped() {
        let mut stepper = stepper();
        let mut state = state_at(180, 0);

        let tilt = block_on(stepper.step_tilt(&mut state, 250));
        assert_eq!(state.tilt_left(), 180);
        assert_eq!(tilt.motion, Motion::Held(180));
        assert!(tilt.faults.iter().any(Fault::is_range_violation));

        let pan = stepper.step_pan(&mut state, -20);
        assert_eq!(state.pan_center(), 0);
        assert!(pan.faults.iter().any(Fault::is_range_violation));
    }

    #[test]
    fn test_write_failure_keeps_dead_reckoning() {
        let mut stepper = Stepper::new(
            Gimbal::new(MockServo::failing(), MockServo::failing(), MockServo::default()),
            MockDelay::default(),
            Foreshortening::default(),
        );
        let mut state = AxisState::home();

        let tilt = block_on(stepper.step_tilt(&mut state, 100));
        assert_eq!(state.tilt_left(), 134);
        assert_eq!(tilt.faults.len(), 1);
        assert!(matches!(
            tilt.faults.iter().next(),
            Some(Fault::ActuatorWriteFailure {
                servo: ServoId::TiltLeft,
                angle: 134,
                ..
            })
        ));
        assert_eq!(stepper.gimbal().tilt_right.angle, Some(46));

        let pan = stepper.step_pan(&mut state, 100);
        assert_eq!(state.pan_center(), 91);
        assert!(pan.faults.iter().all(Fault::is_actuator_fault));
    }

    #[test]
    fn test_commit_all_writes_home() {
        let mut stepper = stepper();
        let faults = stepper.commit_all(&AxisState::home());
        assert!(faults.is_empty());

        let gimbal = stepper.gimbal();
        assert_eq!(gimbal.tilt_left.angle, Some(135));
        assert_eq!(gimbal.pan.angle, Some(90));
        assert_eq!(gimbal.tilt_right.angle, Some(45));
    }

    proptest! {
        #[test]
        fn prop_tilt_converges_in_exact_steps(start in 0i32..=180, target in 0i16..=180) {
            let mut stepper = stepper();
            let mut state = state_at(start, 90);
            let expected = (target as i32 - start).unsigned_abs();

            let mut calls = 0u32;
            while state.tilt_left() != target {
                let before = state.tilt_left();
                block_on(stepper.step_tilt(&mut state, target));
                calls += 1;

                prop_assert_eq!((state.tilt_left() - before).abs(), 1);
                prop_assert_eq!(state.tilt_left() + state.tilt_right(), MIRROR_SUM_DEG);
                prop_assert!(calls <= expected);
            }
            prop_assert_eq!(calls, expected);
        }

        #[test]
        fn prop_pan_converges_monotonically(start in 0i32..=180, target in 0i16..=180) {
            let mut stepper = stepper();
            let mut state = state_at(135, start);
            let expected = (target as i32 - start).unsigned_abs();
            let direction = (target as i32 - start).signum() as i16;

            let mut calls = 0u32;
            while state.pan_center() != target {
                let before = state.pan_center();
                stepper.step_pan(&mut state, target);
                calls += 1;

                prop_assert_eq!(state.pan_center() - before, direction);
                prop_assert!(calls <= expected);
            }
            prop_assert_eq!(calls, expected);
        }
    }
}
