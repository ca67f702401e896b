//! Mathematical utility functions for DSP.
//!
//! Level conversions and block metering used by the dynamics units.
//! All functions are allocation-free and suitable for `no_std`.

use crate::block::AudioBlock;
use libm::{expf, logf, sqrtf};

/// Linear level floor used before dB conversion.
///
/// Metering converts pooled block RMS to dB; flooring the linear value at
/// `1e-8` bounds the result at [`LEVEL_FLOOR_DB`] instead of `-inf` for
/// silent blocks.
pub const LEVEL_FLOOR: f32 = 1e-8;

/// dB value corresponding to [`LEVEL_FLOOR`] (`20 * log10(1e-8)`).
pub const LEVEL_FLOOR_DB: f32 = -160.0;

/// Convert decibels to linear gain.
///
/// # Example
/// ```rust
/// use clarivoz_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// The input is floored at `1e-10` so the result stays finite.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Convert a measured signal level to dB, floored at [`LEVEL_FLOOR_DB`].
///
/// Use this for metering (RMS, envelope) rather than [`linear_to_db`]: the
/// higher floor keeps gate threshold comparisons well away from the region
/// where f32 log conversion loses precision.
#[inline]
pub fn level_to_db(level: f32) -> f32 {
    linear_to_db(level.max(LEVEL_FLOOR))
}

/// Pooled RMS over every channel of a block.
///
/// All channels contribute to a single mean: `sqrt(sum(x^2) / n)` where `n`
/// is the total sample count across channels. Returns `0.0` for an empty
/// block.
pub fn block_rms(block: &AudioBlock) -> f32 {
    let mut sum_squares = 0.0f32;
    let mut count = 0usize;
    for channel in block.channels() {
        for &sample in channel {
            sum_squares += sample * sample;
        }
        count += channel.len();
    }
    if count == 0 {
        return 0.0;
    }
    sqrtf(sum_squares / count as f32)
}

/// Convert a duration in milliseconds to a sample count at the given rate.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> usize {
    ((ms.max(0.0) / 1000.0) * sample_rate.max(0.0)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_linear_round_trip() {
        for &db in &[-60.0, -18.0, -6.0, 0.0, 6.0, 12.0] {
            let rt = linear_to_db(db_to_linear(db));
            assert!((rt - db).abs() < 0.01, "round trip for {db} gave {rt}");
        }
    }

    #[test]
    fn level_to_db_floors_silence() {
        assert!((level_to_db(0.0) - LEVEL_FLOOR_DB).abs() < 0.5);
        assert!(level_to_db(0.0).is_finite());
    }

    #[test]
    fn block_rms_full_scale_dc() {
        let mut block = AudioBlock::new(2, 64);
        for ch in 0..2 {
            block.channel_mut(ch).unwrap().fill(1.0);
        }
        assert!((block_rms(&block) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn block_rms_sine_is_minus_3db() {
        let mut block = AudioBlock::new(1, 4800);
        for (i, s) in block.channel_mut(0).unwrap().iter_mut().enumerate() {
            *s = libm::sinf(i as f32 * core::f32::consts::TAU / 48.0);
        }
        let rms_db = level_to_db(block_rms(&block));
        // Full-scale sine RMS is 1/sqrt(2) = -3.01 dBFS
        assert!((rms_db + 3.01).abs() < 0.1, "got {rms_db}");
    }

    #[test]
    fn block_rms_empty_is_zero() {
        let block = AudioBlock::new(0, 0);
        assert_eq!(block_rms(&block), 0.0);
    }

    #[test]
    fn ms_to_samples_matches_rate() {
        assert_eq!(ms_to_samples(120.0, 48000.0), 5760);
        assert_eq!(ms_to_samples(0.0, 48000.0), 0);
        assert_eq!(ms_to_samples(-5.0, 48000.0), 0);
    }
}
