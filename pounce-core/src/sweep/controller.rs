//! Sweep controller
//!
//! Owns the axis state and the steppers, and drives one sweep at a time
//! from the current position to a [`MotionTarget`]:
//!
//! ```text
//!   IDLE --begin()--> CONVERGING --tick()...--> IDLE
//!                          |
//!                          +--cancelled--> IDLE (position held)
//! ```
//!
//! A tick steps tilt once, steps pan once, then waits the sweep's step
//! delay. Which axes get stepped depends on the [`TerminationPolicy`].

use core::ops::ControlFlow;

use embedded_hal_async::delay::DelayNs;

use super::target::{avoid_midpoint, MotionTarget};
use crate::config::TerminationPolicy;
use crate::motion::axis::{clamp_angle, Axis, AxisState};
use crate::motion::stepper::{StepReport, Stepper};
use crate::safety::{Fault, FaultLog};
use crate::state::{SweepEvent, SweepState};
use crate::traits::ServoActuator;

/// Faults kept per sweep before counting the rest as dropped
pub const SWEEP_FAULT_CAPACITY: usize = 8;

/// Faults raised during a sweep
pub type SweepFaults = FaultLog<SWEEP_FAULT_CAPACITY>;

/// What one tick did
#[derive(Debug, Clone)]
pub struct TickReport {
    /// Tilt step, if tilt was stepped
    pub tilt: Option<StepReport>,
    /// Pan step, if pan was stepped
    pub pan: Option<StepReport>,
    /// Both axes are at the target after this tick
    pub converged: bool,
}

impl TickReport {
    /// Faults raised by either step
    pub fn faults(&self) -> impl Iterator<Item = &Fault> {
        self.tilt
            .iter()
            .chain(self.pan.iter())
            .flat_map(|report| report.faults.iter())
    }
}

/// How a sweep ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SweepOutcome {
    /// Both axes reached the target
    Converged,
    /// Stopped early; the gimbal holds where it was
    Cancelled,
}

/// Summary of a whole sweep
#[derive(Debug, Clone)]
pub struct SweepReport {
    /// Ticks executed
    pub ticks: u32,
    pub outcome: SweepOutcome,
    pub faults: SweepFaults,
}

/// Drives the gimbal through sweeps
pub struct SweepController<L, P, R, D> {
    state: AxisState,
    stepper: Stepper<L, P, R, D>,
    policy: TerminationPolicy,
    phase: SweepState,
    target: Option<MotionTarget>,
}

impl<L, P, R, D> SweepController<L, P, R, D>
where
    L: ServoActuator,
    P: ServoActuator,
    R: ServoActuator,
    D: DelayNs,
{
    /// Create a controller at the home position
    ///
    /// Nothing is written to the servos until [`home`](Self::home) or the
    /// first tick.
    pub fn new(stepper: Stepper<L, P, R, D>, policy: TerminationPolicy) -> Self {
        Self {
            state: AxisState::home(),
            stepper,
            policy,
            phase: SweepState::Idle,
            target: None,
        }
    }

    /// Command all servos to the tracked position
    pub fn home(&mut self) -> SweepFaults {
        let mut faults = SweepFaults::new();
        faults.absorb(&self.stepper.commit_all(&self.state));
        faults
    }

    /// Commanded position
    pub fn state(&self) -> &AxisState {
        &self.state
    }

    /// Current phase
    pub fn phase(&self) -> SweepState {
        self.phase
    }

    /// Target of the current or last sweep
    pub fn target(&self) -> Option<MotionTarget> {
        self.target
    }

    /// Termination policy in use
    pub fn policy(&self) -> TerminationPolicy {
        self.policy
    }

    /// Access the stepper
    pub fn stepper(&self) -> &Stepper<L, P, R, D> {
        &self.stepper
    }

    /// Release the stepper
    pub fn into_stepper(self) -> Stepper<L, P, R, D> {
        self.stepper
    }

    /// Start a sweep toward `target`
    ///
    /// Goals outside 0-180 are clamped and a tilt goal on the mirror
    /// midpoint is moved off it; both are reported.
    pub fn begin(&mut self, target: MotionTarget) -> SweepFaults {
        let mut faults = SweepFaults::new();

        let (tilt, fault) = clamp_angle(Axis::Tilt, target.target_tilt as i32);
        faults.record(fault);
        let (pan, fault) = clamp_angle(Axis::Pan, target.target_pan as i32);
        faults.record(fault);

        let adjusted = avoid_midpoint(tilt);
        if adjusted != tilt {
            faults.push(Fault::MirrorLock {
                requested: tilt,
                adjusted,
            });
        }

        self.target = Some(MotionTarget {
            target_tilt: adjusted,
            target_pan: pan,
            ..target
        });
        self.phase = self.phase.transition(SweepEvent::TargetChosen);
        faults
    }

    /// Check if the tracked position matches the target on both axes
    pub fn is_converged(&self) -> bool {
        self.target.is_some_and(|t| {
            self.state.tilt_left() == t.target_tilt && self.state.pan_center() == t.target_pan
        })
    }

    /// Abandon the current sweep, holding position
    pub fn cancel(&mut self) {
        self.phase = self.phase.transition(SweepEvent::Cancelled);
    }

    /// Run one tick of the current sweep
    ///
    /// Does nothing while idle. Returns to idle once both axes are at the
    /// target.
    pub async fn tick(&mut self) -> TickReport {
        let target = match self.target {
            Some(target) if self.phase.stepping_allowed() => target,
            _ => {
                return TickReport {
                    tilt: None,
                    pan: None,
                    converged: self.is_converged(),
                }
            }
        };

        let every_axis = self.policy.steps_settled_axis();

        let tilt = if every_axis || self.state.tilt_left() != target.target_tilt {
            Some(
                self.stepper
                    .step_tilt(&mut self.state, target.target_tilt)
                    .await,
            )
        } else {
            None
        };

        let pan = if every_axis || self.state.pan_center() != target.target_pan {
            Some(self.stepper.step_pan(&mut self.state, target.target_pan))
        } else {
            None
        };

        self.stepper.wait_ms(target.step_delay_ms as u32).await;

        let converged = self.is_converged();
        if converged {
            self.phase = self.phase.transition(SweepEvent::Converged);
        }

        TickReport {
            tilt,
            pan,
            converged,
        }
    }

    /// Run a whole sweep toward `target`
    ///
    /// `on_tick` sees every tick, including the one that converges, and
    /// can stop the sweep by returning [`ControlFlow::Break`]. A stop on
    /// the converging tick is ignored. A target that is already reached
    /// takes no ticks.
    pub async fn run<F>(&mut self, target: MotionTarget, mut on_tick: F) -> SweepReport
    where
        F: FnMut(&TickReport) -> ControlFlow<()>,
    {
        let mut faults = self.begin(target);
        let mut ticks = 0u32;

        let outcome = loop {
            if self.is_converged() {
                self.phase = self.phase.transition(SweepEvent::Converged);
                break SweepOutcome::Converged;
            }

            let report = self.tick().await;
            ticks += 1;
            for fault in report.faults() {
                faults.push(*fault);
            }

            let flow = on_tick(&report);
            if report.converged {
                break SweepOutcome::Converged;
            }
            if flow.is_break() {
                self.cancel();
                break SweepOutcome::Cancelled;
            }
        };

        SweepReport {
            ticks,
            outcome,
            faults,
        }
    }
}
