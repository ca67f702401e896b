//! Granular time-domain pitch shifter.
//!
//! Incoming audio accumulates in an input ring; once a grain's worth is
//! available, a fixed-size Hann-windowed grain is resynthesized from a
//! ratio-scaled span of that input and overlap-added into an output ring,
//! which is normalized by the accumulated window weights on the way out.
//! The input read cursor advances by a ratio-scaled hop while grains land
//! at a fixed output hop; that asymmetry is what moves pitch.
//!
//! ## Algorithm Overview
//!
//! 1. **Buffer**: mix the block to mono, append to the input ring, shedding
//!    the oldest samples if the backlog would exceed the safe margin
//! 2. **Synthesize**: while a grain of input is available, interpolate
//!    `grain_size` output samples from a `grain_size * ratio` input span,
//!    window them, and accumulate into the output ring
//! 3. **Emit**: pop one block of normalized samples off the output ring,
//!    padding with silence while the initial latency fills
//!
//! ## RT-Safety
//!
//! All buffers are sized at construction. `process()` performs no
//! allocations; sustained backlog is handled by shedding the oldest audio,
//! never by growing memory.

use clarivoz_core::{AudioBlock, BlockProcessor, GrainWindow, OverlapAddRing, RingBuffer};

/// Lowest accepted pitch ratio (one octave down).
pub const MIN_RATIO: f32 = 0.5;

/// Highest accepted pitch ratio (one octave up).
pub const MAX_RATIO: f32 = 2.0;

/// Per-block blend factor moving the live ratio toward its target.
const RATIO_BLEND: f32 = 0.05;

/// Snap distance at which the live ratio locks onto the target.
const RATIO_SNAP: f32 = 0.001;

/// Half-width of the band around 1.0 where synthesis is bypassed.
const BYPASS_BAND: f32 = 0.01;

/// Floor for the overlap-add normalization divisor.
const WINDOW_SUM_FLOOR: f32 = 1e-3;

/// Ring capacity as a multiple of the grain size.
const RING_GRAINS: usize = 8;

/// Configuration errors detectable only at construction.
///
/// Nothing in the streaming path errors; an invalid grain geometry is the
/// one condition that makes synthesis impossible, and it is rejected before
/// any audio flows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PitchConfigError {
    /// Grain size below the two samples interpolation needs.
    GrainTooSmall(usize),
    /// Hop size of zero or larger than the grain.
    HopOutOfRange {
        /// Requested hop size in samples.
        hop: usize,
        /// Configured grain size in samples.
        grain: usize,
    },
    /// Sample rate not a positive finite number.
    InvalidSampleRate(f32),
}

impl core::fmt::Display for PitchConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GrainTooSmall(size) => write!(f, "grain size {size} must be >= 2"),
            Self::HopOutOfRange { hop, grain } => {
                write!(f, "hop size {hop} must be in 1..={grain}")
            }
            Self::InvalidSampleRate(rate) => write!(f, "sample rate {rate} must be positive"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PitchConfigError {}

/// Granular pitch shifter.
///
/// # Example
///
/// ```rust
/// use clarivoz_core::{AudioBlock, BlockProcessor};
/// use clarivoz_effects::PitchShifter;
///
/// let mut shifter = PitchShifter::with_defaults(48000.0).unwrap();
/// shifter.set_target_ratio(1.5);
///
/// let input = AudioBlock::new(1, 128);
/// let mut output = AudioBlock::new(1, 128);
/// assert!(shifter.process(&input, &mut output));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PitchShifter {
    grain_size: usize,
    hop_size: usize,
    window: GrainWindow,
    input: RingBuffer,
    output: OverlapAddRing,

    target_ratio: f32,
    current_ratio: f32,
}

impl PitchShifter {
    /// Create a shifter with explicit grain geometry.
    ///
    /// Ring capacity is sized at `8 * grain_size`, comfortably above the
    /// `2 * grain_size` margin the input bound needs.
    pub fn new(
        sample_rate: f32,
        grain_size: usize,
        hop_size: usize,
    ) -> Result<Self, PitchConfigError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(PitchConfigError::InvalidSampleRate(sample_rate));
        }
        if grain_size < 2 {
            return Err(PitchConfigError::GrainTooSmall(grain_size));
        }
        if hop_size == 0 || hop_size > grain_size {
            return Err(PitchConfigError::HopOutOfRange {
                hop: hop_size,
                grain: grain_size,
            });
        }

        let capacity = grain_size * RING_GRAINS;
        Ok(Self {
            grain_size,
            hop_size,
            window: GrainWindow::hann(grain_size),
            input: RingBuffer::new(capacity),
            output: OverlapAddRing::new(capacity),
            target_ratio: 1.0,
            current_ratio: 1.0,
        })
    }

    /// Create a shifter with the standard 1024-sample grain and 256-sample
    /// hop (75% overlap).
    pub fn with_defaults(sample_rate: f32) -> Result<Self, PitchConfigError> {
        Self::new(sample_rate, 1024, 256)
    }

    /// Set the target pitch ratio, clamped to [`MIN_RATIO`]..=[`MAX_RATIO`].
    ///
    /// Non-finite values are ignored. The live ratio glides toward the
    /// target over the following blocks.
    pub fn set_target_ratio(&mut self, ratio: f32) {
        if !ratio.is_finite() {
            return;
        }
        self.target_ratio = ratio.clamp(MIN_RATIO, MAX_RATIO);
    }

    /// Current target ratio.
    pub fn target_ratio(&self) -> f32 {
        self.target_ratio
    }

    /// Live (smoothed) ratio applied to synthesis this block.
    pub fn current_ratio(&self) -> f32 {
        self.current_ratio
    }

    /// Grain size in samples.
    pub fn grain_size(&self) -> usize {
        self.grain_size
    }

    /// Output hop size in samples.
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Accumulated output samples ready to emit.
    pub fn output_available(&self) -> usize {
        self.output.available()
    }

    /// Glide the live ratio toward the target, snapping when close.
    fn advance_ratio(&mut self) {
        self.current_ratio += (self.target_ratio - self.current_ratio) * RATIO_BLEND;
        if (self.current_ratio - self.target_ratio).abs() < RATIO_SNAP {
            self.current_ratio = self.target_ratio;
        }
    }

    /// Input samples consumed per grain at the live ratio.
    fn input_hop(&self) -> usize {
        ((self.hop_size as f32 * self.current_ratio).round() as usize).max(1)
    }

    /// Resynthesize one grain from the input ring into the output ring.
    fn synthesize_grain(&mut self) {
        let available = self.input.available();
        let span = (((self.grain_size as f32) * self.current_ratio).round() as usize)
            .min(available);
        let input_hop = self.input_hop();

        if span < 2 {
            // Degenerate span: skip forward without emitting rather than
            // dividing by a zero-length source range
            self.input.advance_read(input_hop);
            return;
        }

        let scale = (span - 1) as f32 / (self.grain_size - 1) as f32;
        for i in 0..self.grain_size {
            let src = i as f32 * scale;
            let index = src as usize;
            let frac = src - index as f32;
            let a = self.input.peek(index);
            let b = self.input.peek((index + 1).min(span - 1));
            let weight = self.window.value(i);
            self.output
                .accumulate(i, (a + (b - a) * frac) * weight, weight);
        }
        self.output.commit_grain(self.hop_size, self.grain_size);
        self.input.advance_read(input_hop);
    }
}

impl BlockProcessor for PitchShifter {
    fn process(&mut self, input: &AudioBlock, output: &mut AudioBlock) -> bool {
        self.advance_ratio();

        if input.is_empty() || output.is_empty() {
            output.copy_from(input);
            return true;
        }

        if (self.current_ratio - 1.0).abs() < BYPASS_BAND {
            // No audible shift requested: pass through untouched and drop
            // the stale backlog so re-engaging starts from fresh audio
            output.copy_from(input);
            if self.input.available() > 0 {
                self.input.clear();
            }
            return true;
        }

        let frames = input.frames();

        // Bounded input: shed the oldest backlog before appending
        let margin = self.input.capacity() - 2 * self.grain_size;
        let incoming = self.input.available() + frames;
        if incoming > margin {
            self.input.advance_read(incoming - margin);
        }

        let channel_count = input.channel_count() as f32;
        for i in 0..frames {
            let mut mixed = 0.0;
            for channel in input.channels() {
                mixed += channel[i];
            }
            self.input.push(mixed / channel_count);
        }

        while self.input.available() >= self.grain_size && self.output.can_accept(self.grain_size)
        {
            self.synthesize_grain();
        }

        for i in 0..output.frames() {
            let sample = self.output.pop(WINDOW_SUM_FLOOR).unwrap_or(0.0);
            for channel in output.channels_mut() {
                channel[i] = sample;
            }
        }
        true
    }

    fn set_sample_rate(&mut self, _sample_rate: f32) {
        // Grain geometry is fixed in samples at construction; recomputing it
        // here would require reallocation, which the audio path forbids.
    }

    fn reset(&mut self) {
        self.input.clear();
        self.output.clear();
        self.current_ratio = self.target_ratio;
    }

    fn latency_samples(&self) -> usize {
        self.grain_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clarivoz_core::AudioBlock;

    fn sine_block(frames: usize, freq: f32, sample_rate: f32, phase_offset: usize) -> AudioBlock {
        let mut block = AudioBlock::new(1, frames);
        for (i, sample) in block.channel_mut(0).unwrap().iter_mut().enumerate() {
            let t = (phase_offset + i) as f32 / sample_rate;
            *sample = libm::sinf(core::f32::consts::TAU * freq * t);
        }
        block
    }

    #[test]
    fn construction_validates_geometry() {
        assert!(PitchShifter::new(48000.0, 1024, 256).is_ok());
        assert_eq!(
            PitchShifter::new(48000.0, 1, 1),
            Err(PitchConfigError::GrainTooSmall(1))
        );
        assert_eq!(
            PitchShifter::new(48000.0, 64, 0),
            Err(PitchConfigError::HopOutOfRange { hop: 0, grain: 64 })
        );
        assert_eq!(
            PitchShifter::new(48000.0, 64, 65),
            Err(PitchConfigError::HopOutOfRange { hop: 65, grain: 64 })
        );
        assert_eq!(
            PitchShifter::new(0.0, 1024, 256),
            Err(PitchConfigError::InvalidSampleRate(0.0))
        );
    }

    #[test]
    fn ratio_clamps_on_receipt() {
        let mut shifter = PitchShifter::with_defaults(48000.0).unwrap();
        shifter.set_target_ratio(3.0);
        assert_eq!(shifter.target_ratio(), MAX_RATIO);
        shifter.set_target_ratio(0.1);
        assert_eq!(shifter.target_ratio(), MIN_RATIO);
        shifter.set_target_ratio(f32::NAN);
        assert_eq!(shifter.target_ratio(), MIN_RATIO);
    }

    #[test]
    fn unity_ratio_is_identity() {
        let mut shifter = PitchShifter::with_defaults(48000.0).unwrap();
        let input = sine_block(128, 220.0, 48000.0, 0);
        let mut output = AudioBlock::new(1, 128);

        for _ in 0..20 {
            shifter.process(&input, &mut output);
        }
        assert_eq!(output.channel(0).unwrap(), input.channel(0).unwrap());
    }

    #[test]
    fn ratio_glides_and_snaps() {
        let mut shifter = PitchShifter::with_defaults(48000.0).unwrap();
        shifter.set_target_ratio(2.0);

        let input = AudioBlock::new(1, 128);
        let mut output = AudioBlock::new(1, 128);
        shifter.process(&input, &mut output);
        let after_one = shifter.current_ratio();
        assert!(after_one > 1.0 && after_one < 1.1, "got {after_one}");

        for _ in 0..400 {
            shifter.process(&input, &mut output);
        }
        assert_eq!(shifter.current_ratio(), 2.0);
    }

    #[test]
    fn output_silent_during_latency_fill() {
        let mut shifter = PitchShifter::new(48000.0, 1024, 256).unwrap();
        shifter.set_target_ratio(0.5);

        let input = sine_block(128, 220.0, 48000.0, 0);
        let mut output = AudioBlock::new(1, 128);
        shifter.process(&input, &mut output);
        // First block: not even one grain buffered yet
        assert!(output.channel(0).unwrap().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn pitch_down_steady_state_has_no_gaps() {
        let sample_rate = 48000.0;
        let mut shifter = PitchShifter::new(sample_rate, 1024, 256).unwrap();
        shifter.set_target_ratio(0.5);

        let mut output = AudioBlock::new(1, 128);
        // Settle the ratio and fill the latency
        for b in 0..200 {
            let input = sine_block(128, 220.0, sample_rate, b * 128);
            shifter.process(&input, &mut output);
        }

        // Steady state: every emitted block is fully populated
        for b in 200..260 {
            let input = sine_block(128, 220.0, sample_rate, b * 128);
            shifter.process(&input, &mut output);
            let silent = output
                .channel(0)
                .unwrap()
                .iter()
                .filter(|&&s| s == 0.0)
                .count();
            assert!(silent < 4, "silent gap in steady-state block {b}");
        }
    }

    #[test]
    fn pitch_up_doubles_zero_crossing_rate() {
        let sample_rate = 48000.0;
        let mut shifter = PitchShifter::new(sample_rate, 1024, 256).unwrap();
        shifter.set_target_ratio(2.0);

        let mut emitted = Vec::new();
        let mut output = AudioBlock::new(1, 128);
        for b in 0..400 {
            let input = sine_block(128, 220.0, sample_rate, b * 128);
            shifter.process(&input, &mut output);
            if b >= 150 {
                emitted.extend_from_slice(output.channel(0).unwrap());
            }
        }

        // Count zero crossings over non-silent spans only: at ratio 2 the
        // input is consumed faster than it arrives, so emission alternates
        // with refill silence
        let mut crossings = 0usize;
        let mut voiced = 0usize;
        let mut previous = 0.0f32;
        for &sample in &emitted {
            if sample != 0.0 {
                voiced += 1;
                if previous != 0.0 && (sample > 0.0) != (previous > 0.0) {
                    crossings += 1;
                }
            }
            previous = sample;
        }
        assert!(voiced > 1000, "not enough voiced output to measure");

        // 440 Hz at 48 kHz crosses zero every ~54 samples
        let rate = crossings as f32 / voiced as f32;
        let expected = 2.0 * 440.0 / sample_rate;
        assert!(
            (rate - expected).abs() < expected * 0.25,
            "crossing rate {rate} vs expected {expected}"
        );
    }

    #[test]
    fn bypass_band_resets_input_backlog() {
        let mut shifter = PitchShifter::with_defaults(48000.0).unwrap();
        shifter.set_target_ratio(2.0);

        let input = sine_block(128, 220.0, 48000.0, 0);
        let mut output = AudioBlock::new(1, 128);
        for _ in 0..50 {
            shifter.process(&input, &mut output);
        }

        // Glide back to unity; once inside the band the backlog is dropped
        shifter.set_target_ratio(1.0);
        for _ in 0..200 {
            shifter.process(&input, &mut output);
        }
        assert_eq!(shifter.current_ratio(), 1.0);
        assert_eq!(output.channel(0).unwrap(), input.channel(0).unwrap());
    }

    #[test]
    fn sustained_input_never_overflows() {
        let mut shifter = PitchShifter::new(48000.0, 256, 64).unwrap();
        shifter.set_target_ratio(0.5);

        let mut output = AudioBlock::new(1, 512);
        for b in 0..500 {
            let input = sine_block(512, 330.0, 48000.0, b * 512);
            shifter.process(&input, &mut output);
            assert!(shifter.output_available() <= shifter.grain_size() * RING_GRAINS);
            for &s in output.channel(0).unwrap() {
                assert!(s.is_finite());
                assert!(s.abs() < 4.0, "unnormalized spike {s}");
            }
        }
    }

    #[test]
    fn latency_reports_one_grain() {
        let shifter = PitchShifter::new(48000.0, 512, 128).unwrap();
        assert_eq!(shifter.latency_samples(), 512);
    }

    #[test]
    fn stereo_input_mixes_and_duplicates() {
        let mut shifter = PitchShifter::new(48000.0, 256, 64).unwrap();
        shifter.set_target_ratio(0.5);

        let mut output = AudioBlock::new(2, 128);
        for b in 0..100 {
            let mono = sine_block(128, 220.0, 48000.0, b * 128);
            let mut stereo = AudioBlock::new(2, 128);
            stereo.channel_mut(0).unwrap().copy_from_slice(mono.channel(0).unwrap());
            stereo.channel_mut(1).unwrap().copy_from_slice(mono.channel(0).unwrap());
            shifter.process(&stereo, &mut output);
        }
        assert_eq!(output.channel(0).unwrap(), output.channel(1).unwrap());
    }

    #[test]
    fn reset_clears_backlog() {
        let mut shifter = PitchShifter::with_defaults(48000.0).unwrap();
        shifter.set_target_ratio(0.5);
        let input = sine_block(128, 220.0, 48000.0, 0);
        let mut output = AudioBlock::new(1, 128);
        for _ in 0..100 {
            shifter.process(&input, &mut output);
        }
        assert!(shifter.output_available() > 0);

        shifter.reset();
        assert_eq!(shifter.output_available(), 0);
        assert_eq!(shifter.current_ratio(), shifter.target_ratio());
    }
}
