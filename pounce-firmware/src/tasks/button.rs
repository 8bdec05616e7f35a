//! Pause button task
//!
//! Active-low push button with the internal pull-up. Each debounced press
//! toggles between sweeping and holding still.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;

use crate::channels::{SweepControl, SWEEP_CONTROL};

/// Time the button must stay down to count as a press
const DEBOUNCE_MS: u64 = 30;

/// Pause button task
#[embassy_executor::task]
pub async fn button_task(mut button: Input<'static>) {
    info!("Button task started");

    let mut paused = false;

    loop {
        button.wait_for_low().await;
        Timer::after_millis(DEBOUNCE_MS).await;

        if button.is_low() {
            paused = !paused;
            let request = if paused {
                SweepControl::Pause
            } else {
                SweepControl::Resume
            };
            info!("Button: {}", request);
            SWEEP_CONTROL.signal(request);
        }

        button.wait_for_high().await;
        Timer::after_millis(DEBOUNCE_MS).await;
    }
}
