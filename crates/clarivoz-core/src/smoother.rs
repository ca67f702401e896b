//! Block-rate gain smoothing with split attack/release time constants.
//!
//! The dynamics units compute one target gain per block; jumping straight to
//! it would click. [`BlockGainSmoother`] advances a one-pole exponential
//! filter once per block, choosing the attack time constant when gain is
//! falling (the unit is clamping down) and the release time constant when
//! gain is recovering.

use libm::expf;

/// Minimum attack time in milliseconds.
pub const MIN_ATTACK_MS: f32 = 1.0;

/// Minimum release time in milliseconds.
pub const MIN_RELEASE_MS: f32 = 5.0;

/// One-pole gain smoother advanced once per block.
///
/// The per-block coefficient is `exp(-block_len / (sample_rate * tau))`
/// where `tau` is the active time constant in seconds, so convergence speed
/// is independent of the host's block size.
///
/// # Example
///
/// ```rust
/// use clarivoz_core::BlockGainSmoother;
///
/// let mut smoother = BlockGainSmoother::new(48000.0);
/// smoother.set_attack_ms(5.0);
/// let gain = smoother.advance(0.1, 128);
/// assert!(gain < 1.0 && gain > 0.1);
/// ```
#[derive(Debug, Clone)]
pub struct BlockGainSmoother {
    current: f32,
    attack_ms: f32,
    release_ms: f32,
    sample_rate: f32,
}

impl BlockGainSmoother {
    /// Create a smoother starting at unity gain.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            current: 1.0,
            attack_ms: 10.0,
            release_ms: 100.0,
            sample_rate,
        }
    }

    /// Set the attack time (gain decreasing), floored at [`MIN_ATTACK_MS`].
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.attack_ms = attack_ms.max(MIN_ATTACK_MS);
    }

    /// Current attack time in ms.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Set the release time (gain increasing), floored at [`MIN_RELEASE_MS`].
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.release_ms = release_ms.max(MIN_RELEASE_MS);
    }

    /// Current release time in ms.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Update the sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Current smoothed gain without advancing.
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Snap to a gain immediately, bypassing smoothing.
    pub fn snap_to(&mut self, gain: f32) {
        self.current = gain;
    }

    /// Advance by one block toward `target` and return the new gain.
    #[inline]
    pub fn advance(&mut self, target: f32, block_len: usize) -> f32 {
        let time_ms = if target < self.current {
            self.attack_ms
        } else {
            self.release_ms
        };
        let tau_samples = self.sample_rate * (time_ms / 1000.0);
        let coeff = if tau_samples > 0.0 {
            expf(-(block_len as f32) / tau_samples)
        } else {
            0.0
        };
        self.current = target + (self.current - target) * coeff;
        self.current
    }
}
