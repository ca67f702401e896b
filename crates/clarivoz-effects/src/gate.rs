//! Noise gate with hysteresis and hold.
//!
//! The gate measures pooled block RMS, decides open/closed with an
//! asymmetric threshold pair, smooths the resulting gain, and applies it
//! uniformly to every channel. Closing requires the signal to stay below
//! the close threshold for the full hold time; reopening requires the
//! signal to climb all the way back to the main threshold. The gap between
//! the two thresholds is the hysteresis band that prevents chatter when a
//! signal hovers near one level.

use clarivoz_core::{
    AudioBlock, BlockGainSmoother, BlockProcessor, block_rms, db_to_linear, level_to_db,
    ms_to_samples,
};

/// Hard noise gate driven by block RMS.
///
/// ## Parameters
///
/// | Parameter | Range | Default |
/// |-----------|-------|---------|
/// | Threshold | -80.0–0.0 dB | -50.0 |
/// | Hysteresis | 0.0–24.0 dB | 6.0 |
/// | Reduction | 0.0–60.0 dB | 18.0 |
/// | Attack | 1.0–500.0 ms | 5.0 |
/// | Release | 5.0–2000.0 ms | 120.0 |
/// | Hold | 0.0–1000.0 ms | 120.0 |
///
/// # Example
///
/// ```rust
/// use clarivoz_core::{AudioBlock, BlockProcessor};
/// use clarivoz_effects::NoiseGate;
///
/// let mut gate = NoiseGate::new(48000.0);
/// gate.set_threshold_db(-55.0);
/// gate.set_hold_ms(120.0);
///
/// let input = AudioBlock::new(1, 128);
/// let mut output = AudioBlock::new(1, 128);
/// assert!(gate.process(&input, &mut output));
/// ```
#[derive(Debug, Clone)]
pub struct NoiseGate {
    enabled: bool,
    threshold_db: f32,
    hysteresis_db: f32,
    reduction_db: f32,
    hold_ms: f32,

    gain: BlockGainSmoother,
    /// Current gate state: open passes signal, closed attenuates.
    is_open: bool,
    /// True while the below-threshold hold countdown is running.
    holding: bool,
    /// Hold countdown in samples.
    hold_remaining: u32,

    sample_rate: f32,
}

impl NoiseGate {
    /// Create a gate with default settings, fully open.
    pub fn new(sample_rate: f32) -> Self {
        let mut gain = BlockGainSmoother::new(sample_rate);
        gain.set_attack_ms(5.0);
        gain.set_release_ms(120.0);
        Self {
            enabled: true,
            threshold_db: -50.0,
            hysteresis_db: 6.0,
            reduction_db: 18.0,
            hold_ms: 120.0,
            gain,
            is_open: true,
            holding: false,
            hold_remaining: 0,
            sample_rate,
        }
    }

    /// Enable or disable the gate. Disabled forces the gate open.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the gate is enabled.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Set the open threshold in dB (-80 to 0).
    pub fn set_threshold_db(&mut self, threshold_db: f32) {
        self.threshold_db = threshold_db.clamp(-80.0, 0.0);
    }

    /// Current open threshold in dB.
    pub fn threshold_db(&self) -> f32 {
        self.threshold_db
    }

    /// Set the hysteresis band width in dB (0 to 24).
    pub fn set_hysteresis_db(&mut self, hysteresis_db: f32) {
        self.hysteresis_db = hysteresis_db.clamp(0.0, 24.0);
    }

    /// Current hysteresis band width in dB.
    pub fn hysteresis_db(&self) -> f32 {
        self.hysteresis_db
    }

    /// Set the maximum attenuation in dB (0 to 60).
    pub fn set_reduction_db(&mut self, reduction_db: f32) {
        self.reduction_db = reduction_db.abs().clamp(0.0, 60.0);
    }

    /// Current maximum attenuation in dB.
    pub fn reduction_db(&self) -> f32 {
        self.reduction_db
    }

    /// Set the attack time in ms (floored at 1 ms).
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.gain.set_attack_ms(attack_ms.min(500.0));
    }

    /// Current attack time in ms.
    pub fn attack_ms(&self) -> f32 {
        self.gain.attack_ms()
    }

    /// Set the release time in ms (floored at 5 ms).
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.gain.set_release_ms(release_ms.min(2000.0));
    }

    /// Current release time in ms.
    pub fn release_ms(&self) -> f32 {
        self.gain.release_ms()
    }

    /// Set the hold time in ms (0 to 1000).
    pub fn set_hold_ms(&mut self, hold_ms: f32) {
        self.hold_ms = hold_ms.clamp(0.0, 1000.0);
    }

    /// Current hold time in ms.
    pub fn hold_ms(&self) -> f32 {
        self.hold_ms
    }

    /// Whether the gate is currently open.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Current smoothed gain.
    pub fn current_gain(&self) -> f32 {
        self.gain.current()
    }

    /// Threshold below which an open gate starts its hold countdown.
    fn close_threshold_db(&self) -> f32 {
        self.threshold_db - self.hysteresis_db.max(0.0)
    }

    /// Advance the open/closed state machine by one block.
    fn update_state(&mut self, rms_db: f32, block_len: usize) {
        if !self.enabled {
            // Bypass: force open and drop any pending countdown
            self.is_open = true;
            self.holding = false;
            self.hold_remaining = 0;
            return;
        }

        if self.is_open {
            if rms_db < self.close_threshold_db() {
                if !self.holding {
                    self.holding = true;
                    self.hold_remaining = ms_to_samples(self.hold_ms, self.sample_rate) as u32;
                }
                self.hold_remaining = self.hold_remaining.saturating_sub(block_len as u32);
                if self.hold_remaining == 0 {
                    self.is_open = false;
                    self.holding = false;
                }
            } else {
                // Signal recovered within the hold window
                self.holding = false;
            }
        } else if rms_db >= self.threshold_db {
            // Reopen only at the full threshold, not the lower close
            // threshold: the asymmetry is the hysteresis
            self.is_open = true;
        }
    }
}

impl BlockProcessor for NoiseGate {
    fn process(&mut self, input: &AudioBlock, output: &mut AudioBlock) -> bool {
        if input.is_empty() || output.is_empty() {
            output.copy_from(input);
            return true;
        }

        let rms = block_rms(input);
        if !rms.is_finite() {
            output.copy_from(input);
            return true;
        }

        let block_len = input.frames();
        self.update_state(level_to_db(rms), block_len);

        let target = if self.is_open {
            1.0
        } else {
            db_to_linear(-self.reduction_db)
        };
        let gain = self.gain.advance(target, block_len);

        output.copy_from(input);
        for channel in output.channels_mut() {
            for sample in channel {
                *sample *= gain;
            }
        }
        true
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.gain.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.is_open = true;
        self.holding = false;
        self.hold_remaining = 0;
        self.gain.snap_to(1.0);
    }
}
