//! Random seed from ADC noise
//!
//! A floating analog input picks up enough noise that the low bits of
//! repeated conversions differ from boot to boot.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_time::Instant;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Conversions folded into the seed
const SAMPLES: usize = 64;

/// Fold one conversion into the running seed
fn mix(seed: u64, sample: u16) -> u64 {
    (seed.rotate_left(7) ^ sample as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Seed a generator from a floating ADC input
pub async fn seeded_rng(adc: &mut Adc<'static, Async>, noise: &mut Channel<'static>) -> ChaCha8Rng {
    let mut seed = Instant::now().as_ticks();
    let mut failures = 0u32;

    for _ in 0..SAMPLES {
        match adc.read(noise).await {
            Ok(sample) => seed = mix(seed, sample),
            Err(_) => failures += 1,
        }
    }

    if failures > 0 {
        warn!("{} of {} ADC reads failed while seeding", failures, SAMPLES);
    }
    debug!("RNG seed {=u64:x}", seed);

    ChaCha8Rng::seed_from_u64(seed)
}
