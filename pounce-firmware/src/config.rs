//! Gimbal configuration
//!
//! `gimbal.toml` is compiled into the firmware and checked by the build
//! script, so a parse failure here means the reader and the build
//! disagree. The firmware keeps running on defaults in that case.

use defmt::*;

use pounce_core::config::{load_config, GimbalConfig};

/// Embedded configuration (edit gimbal.toml and rebuild to customize)
const EMBEDDED_CONFIG: &str = include_str!("../gimbal.toml");

/// Load the embedded configuration, falling back to defaults
pub fn load() -> GimbalConfig {
    match load_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            log_summary(&config);
            config
        }
        Err(e) => {
            error!("Invalid gimbal.toml ({}), using defaults", e);
            GimbalConfig::default()
        }
    }
}

fn log_summary(config: &GimbalConfig) {
    let sweep = &config.sweep;
    info!(
        "Sweep envelope: tilt span {}°, pan span {}°, termination {}",
        sweep.vertical_span_deg, sweep.horizontal_span_deg, sweep.termination
    );
    debug!(
        "Step delay {}+{}ms, pause {}+{}ms, foreshortening 1/{}",
        sweep.step_delay_base_ms,
        sweep.step_delay_jitter_ms,
        sweep.pause_base_ms,
        sweep.pause_jitter_ms,
        sweep.foreshortening_divisor
    );
    debug!(
        "Servo pulse {}-{}us every {}us",
        config.servo.min_pulse_us, config.servo.max_pulse_us, config.servo.period_us
    );
}
