//! Core BlockProcessor trait and chaining.
//!
//! The [`BlockProcessor`] trait is the contract between the host audio
//! engine and a processing unit: one synchronous call per fixed-size block,
//! on the host's real-time callback thread.
//!
//! ## Design Decisions
//!
//! - **Block granularity**: the host decides block shape; units never
//!   retain a block past the call.
//! - **Keep-alive return**: `process` returns whether the unit should keep
//!   being invoked. Units return `true` for their entire lifetime; the host
//!   drops a unit by ceasing to call it.
//! - **No allocations**: implementations must not allocate or block inside
//!   `process`. [`Chain`] preallocates its mid buffer at construction for
//!   the same reason.

use crate::block::AudioBlock;

/// Contract for block-synchronous processing units.
///
/// # Example
///
/// ```rust
/// use clarivoz_core::{AudioBlock, BlockProcessor};
///
/// struct Gain(f32);
///
/// impl BlockProcessor for Gain {
///     fn process(&mut self, input: &AudioBlock, output: &mut AudioBlock) -> bool {
///         output.copy_from(input);
///         for channel in output.channels_mut() {
///             for sample in channel {
///                 *sample *= self.0;
///             }
///         }
///         true
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///     fn reset(&mut self) {}
/// }
/// ```
pub trait BlockProcessor {
    /// Process one block.
    ///
    /// `output` has the shape the host expects back; implementations fill
    /// every output channel, falling back to input channel 0 when the input
    /// has fewer channels. Returns `true` to keep being invoked.
    fn process(&mut self, input: &AudioBlock, output: &mut AudioBlock) -> bool;

    /// Update the sample rate.
    ///
    /// Called outside the audio path when the host reconfigures. Units
    /// recalculate rate-dependent coefficients here.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Clear internal runtime state without changing parameters.
    fn reset(&mut self);

    /// Algorithmic latency in samples introduced by this unit.
    ///
    /// Default returns 0 (no latency).
    fn latency_samples(&self) -> usize {
        0
    }
}

/// Two processors chained in series.
///
/// The first unit's output block feeds the second unit's input through a
/// mid buffer preallocated at construction, so chaining adds no audio-path
/// allocations as long as the host stays within the declared maxima.
pub struct Chain<A, B> {
    first: A,
    second: B,
    mid: AudioBlock,
}

impl<A: BlockProcessor, B: BlockProcessor> Chain<A, B> {
    /// Chain `first` into `second`, sizing the mid buffer for the largest
    /// block shape the host will deliver.
    pub fn new(first: A, second: B, max_channels: usize, max_frames: usize) -> Self {
        Self {
            first,
            second,
            mid: AudioBlock::new(max_channels, max_frames),
        }
    }

    /// Reference to the first unit.
    pub fn first(&self) -> &A {
        &self.first
    }

    /// Mutable reference to the first unit (for parameter routing).
    pub fn first_mut(&mut self) -> &mut A {
        &mut self.first
    }

    /// Reference to the second unit.
    pub fn second(&self) -> &B {
        &self.second
    }

    /// Mutable reference to the second unit (for parameter routing).
    pub fn second_mut(&mut self) -> &mut B {
        &mut self.second
    }
}

impl<A: BlockProcessor, B: BlockProcessor> BlockProcessor for Chain<A, B> {
    fn process(&mut self, input: &AudioBlock, output: &mut AudioBlock) -> bool {
        self.mid.match_shape(input);
        let first_alive = self.first.process(input, &mut self.mid);
        let second_alive = self.second.process(&self.mid, output);
        first_alive && second_alive
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.first.set_sample_rate(sample_rate);
        self.second.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.first.reset();
        self.second.reset();
    }

    fn latency_samples(&self) -> usize {
        self.first.latency_samples() + self.second.latency_samples()
    }
}
