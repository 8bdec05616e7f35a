//! Sweep task
//!
//! Owns the gimbal. Picks a random target, steps toward it one degree per
//! tick, rests, and repeats. A pause request from the button abandons the
//! current sweep and holds position until resumed.

use core::ops::ControlFlow;

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::pwm::PwmOutput;
use embassy_time::{Delay, Timer};
use rand_chacha::ChaCha8Rng;

use pounce_core::safety::FaultLog;
use pounce_core::sweep::{SweepController, SweepOutcome, TargetSource};
use pounce_drivers::servo::PwmServo;

use crate::channels::{SweepControl, SWEEP_CONTROL};

/// One hobby servo on an RP2040 PWM channel
pub type Servo = PwmServo<PwmOutput<'static>>;

/// Sweep controller over the three gimbal servos
pub type GimbalController = SweepController<Servo, Servo, Servo, Delay>;

fn log_faults<const N: usize>(faults: &FaultLog<N>) {
    for fault in faults.iter() {
        warn!("Fault: {}", fault);
    }
    if faults.dropped() > 0 {
        warn!("{} more faults not shown", faults.dropped());
    }
}

/// Block until the button asks to resume
async fn wait_for_resume() {
    while SWEEP_CONTROL.wait().await != SweepControl::Resume {}
    info!("Sweeping resumed");
}

/// Sweep task
#[embassy_executor::task]
pub async fn sweep_task(
    mut controller: GimbalController,
    source: TargetSource,
    mut rng: ChaCha8Rng,
) {
    info!("Sweep task started ({})", controller.policy());

    log_faults(&controller.home());
    let mut sweeps: u32 = 0;

    loop {
        let plan = source.next_plan(&mut rng);
        let start = *controller.state();
        debug!(
            "Sweep {}: tilt {} -> {}, pan {} -> {}, step {}ms",
            sweeps,
            start.tilt_left(),
            plan.target.target_tilt,
            start.pan_center(),
            plan.target.target_pan,
            plan.target.step_delay_ms
        );

        let mut pause_requested = false;
        let report = controller
            .run(plan.target, |tick| {
                trace!(
                    "tick tilt={} pan={}",
                    tick.tilt.as_ref().map(|r| r.motion.angle()),
                    tick.pan.as_ref().map(|r| r.motion.angle())
                );
                match SWEEP_CONTROL.try_take() {
                    Some(SweepControl::Pause) => {
                        pause_requested = true;
                        ControlFlow::Break(())
                    }
                    Some(SweepControl::Resume) => {
                        pause_requested = false;
                        ControlFlow::Continue(())
                    }
                    None => ControlFlow::Continue(()),
                }
            })
            .await;

        sweeps = sweeps.wrapping_add(1);
        log_faults(&report.faults);

        if report.outcome == SweepOutcome::Cancelled {
            info!("Sweep paused after {} ticks", report.ticks);
            wait_for_resume().await;
            continue;
        }
        if pause_requested {
            info!("Paused on arrival");
            wait_for_resume().await;
            continue;
        }

        debug!("Converged in {} ticks, resting {}ms", report.ticks, plan.pause_ms);

        let rest = select(
            Timer::after_millis(plan.pause_ms as u64),
            SWEEP_CONTROL.wait(),
        )
        .await;

        if let Either::Second(SweepControl::Pause) = rest {
            info!("Paused while resting");
            wait_for_resume().await;
        }
    }
}
