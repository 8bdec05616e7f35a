//! Pounce - Laser Gimbal Firmware
//!
//! Main firmware binary for an RP2040 driving a three-servo pan/tilt
//! gimbal. Two mirrored servos tilt a laser, a third pans it, and the dot
//! wanders between random floor positions one degree at a time.
//!
//! Pin assignment:
//! - GPIO16: left tilt servo (PWM slice 0 A)
//! - GPIO17: right tilt servo (PWM slice 0 B)
//! - GPIO18: pan servo (PWM slice 1 A)
//! - GPIO15: pause button to ground
//! - GPIO26: left floating, sampled for the random seed

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use pounce_core::config::ServoHwConfig;
use pounce_core::motion::{Foreshortening, Gimbal, Stepper};
use pounce_core::sweep::{SweepController, TargetSource};
use pounce_drivers::servo::PwmServo;

mod channels;
mod config;
mod entropy;
mod tasks;

bind_interrupts!(struct Irqs {
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

/// PWM clock divider; keeps the 50 Hz period inside the 16-bit counter
const PWM_DIVIDER: u8 = 64;

/// PWM slice settings for the servo period
fn servo_pwm_config(servo: &ServoHwConfig) -> PwmConfig {
    let clock_hz = embassy_rp::clocks::clk_sys_freq();
    let ticks = clock_hz / (servo.frequency_hz() * PWM_DIVIDER as u32);

    let mut config = PwmConfig::default();
    config.divider = PWM_DIVIDER.into();
    config.top = ticks.saturating_sub(1).min(u16::MAX as u32) as u16;
    config
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Pounce firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();

    // Random seed from the floating ADC pin
    let mut adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let mut noise = Channel::new_pin(p.PIN_26, Pull::None);
    let rng = entropy::seeded_rng(&mut adc, &mut noise).await;

    // Servo outputs: both tilt servos share slice 0, pan has slice 1
    let pwm_config = servo_pwm_config(&config.servo);
    debug!("PWM top={} divider={}", pwm_config.top, PWM_DIVIDER);

    let tilt_pwm = Pwm::new_output_ab(p.PWM_SLICE0, p.PIN_16, p.PIN_17, pwm_config.clone());
    let (tilt_left, tilt_right) = tilt_pwm.split();
    let pan_pwm = Pwm::new_output_a(p.PWM_SLICE1, p.PIN_18, pwm_config);
    let (pan, _) = pan_pwm.split();

    let gimbal = Gimbal::new(
        PwmServo::new(unwrap!(tilt_left), config.servo),
        PwmServo::new(unwrap!(pan), config.servo),
        PwmServo::new(unwrap!(tilt_right), config.servo),
    );
    let stepper = Stepper::new(
        gimbal,
        Delay,
        Foreshortening::new(config.sweep.foreshortening_divisor),
    );
    let controller = SweepController::new(stepper, config.sweep.termination);
    info!("Servos initialized");

    let button = Input::new(p.PIN_15, Pull::Up);

    spawner
        .spawn(tasks::sweep_task(
            controller,
            TargetSource::new(config.sweep),
            rng,
        ))
        .unwrap();
    spawner.spawn(tasks::button_task(button)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
