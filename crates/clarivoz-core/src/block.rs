//! Multi-channel audio block buffers.
//!
//! An [`AudioBlock`] is the unit of exchange between the host callback and a
//! processing unit: one sample array per channel, all of equal length, with
//! values nominally in [-1, 1]. The host decides the shape; units own a block
//! only for the duration of one call and never retain it.
//!
//! # Memory
//!
//! Blocks are allocated once and reused. [`AudioBlock::set_frames`] changes
//! the active frame count without reallocating as long as it stays within
//! the originally allocated capacity, so a preallocated scratch block can
//! follow the host's per-callback block size in the audio path.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::vec;
use alloc::vec::Vec;

/// A block of multi-channel audio samples.
///
/// # Example
///
/// ```rust
/// use clarivoz_core::AudioBlock;
///
/// let mut block = AudioBlock::new(2, 128);
/// block.channel_mut(0).unwrap()[0] = 0.5;
/// assert_eq!(block.channel_count(), 2);
/// assert_eq!(block.frames(), 128);
/// ```
#[derive(Debug, Clone)]
pub struct AudioBlock {
    channels: Vec<Vec<f32>>,
    frames: usize,
}

impl AudioBlock {
    /// Create a block with the given channel count and frame count, zeroed.
    pub fn new(channels: usize, frames: usize) -> Self {
        Self {
            channels: vec![vec![0.0; frames]; channels],
            frames,
        }
    }

    /// Number of channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of active frames per channel.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// True if the block carries no audio (no channels or zero frames).
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty() || self.frames == 0
    }

    /// Borrow one channel's samples.
    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(|c| c.as_slice())
    }

    /// Mutably borrow one channel's samples.
    pub fn channel_mut(&mut self, index: usize) -> Option<&mut [f32]> {
        self.channels.get_mut(index).map(|c| c.as_mut_slice())
    }

    /// Iterate over all channels.
    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        self.channels.iter().map(|c| c.as_slice())
    }

    /// Iterate mutably over all channels.
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.channels.iter_mut().map(|c| c.as_mut_slice())
    }

    /// Change the active frame count.
    ///
    /// Does not reallocate when `frames` is within the capacity the block
    /// was created with; grown frames are zeroed.
    pub fn set_frames(&mut self, frames: usize) {
        for channel in &mut self.channels {
            channel.resize(frames, 0.0);
        }
        self.frames = frames;
    }

    /// Match another block's channel count and frame count.
    ///
    /// Intended for scratch buffers that track the host's block shape.
    /// Adding channels allocates, so scratch blocks should be created with
    /// the maximum channel count they will see.
    pub fn match_shape(&mut self, other: &AudioBlock) {
        self.channels
            .resize_with(other.channel_count(), || Vec::with_capacity(other.frames()));
        self.set_frames(other.frames());
    }

    /// Zero every sample.
    pub fn fill_silence(&mut self) {
        for channel in &mut self.channels {
            channel.fill(0.0);
        }
    }

    /// Copy samples from another block, channel for channel.
    ///
    /// Output channels with no counterpart in `src` fall back to `src`
    /// channel 0; if `src` has no channels at all the block is silenced.
    /// Copies at most the smaller of the two frame counts.
    pub fn copy_from(&mut self, src: &AudioBlock) {
        if src.channels.is_empty() {
            self.fill_silence();
            return;
        }
        for (index, channel) in self.channels.iter_mut().enumerate() {
            let source = src
                .channels
                .get(index)
                .unwrap_or(&src.channels[0])
                .as_slice();
            let frames = channel.len().min(source.len());
            channel[..frames].copy_from_slice(&source[..frames]);
            for sample in &mut channel[frames..] {
                *sample = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_block_is_zeroed() {
        let block = AudioBlock::new(2, 16);
        assert!(block.channels().all(|c| c.iter().all(|&s| s == 0.0)));
        assert_eq!(block.frames(), 16);
    }

    #[test]
    fn set_frames_within_capacity() {
        let mut block = AudioBlock::new(1, 256);
        block.set_frames(128);
        assert_eq!(block.frames(), 128);
        assert_eq!(block.channel(0).unwrap().len(), 128);
        block.set_frames(256);
        assert_eq!(block.channel(0).unwrap().len(), 256);
    }

    #[test]
    fn copy_from_matching_shape() {
        let mut src = AudioBlock::new(2, 8);
        src.channel_mut(0).unwrap().fill(0.25);
        src.channel_mut(1).unwrap().fill(-0.5);

        let mut dst = AudioBlock::new(2, 8);
        dst.copy_from(&src);
        assert!(dst.channel(0).unwrap().iter().all(|&s| s == 0.25));
        assert!(dst.channel(1).unwrap().iter().all(|&s| s == -0.5));
    }

    #[test]
    fn copy_from_missing_channel_falls_back_to_first() {
        let mut src = AudioBlock::new(1, 8);
        src.channel_mut(0).unwrap().fill(0.75);

        let mut dst = AudioBlock::new(2, 8);
        dst.copy_from(&src);
        assert!(dst.channel(1).unwrap().iter().all(|&s| s == 0.75));
    }

    #[test]
    fn copy_from_empty_source_silences() {
        let src = AudioBlock::new(0, 0);
        let mut dst = AudioBlock::new(1, 4);
        dst.channel_mut(0).unwrap().fill(1.0);
        dst.copy_from(&src);
        assert!(dst.channel(0).unwrap().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn match_shape_tracks_source() {
        let src = AudioBlock::new(3, 64);
        let mut scratch = AudioBlock::new(3, 256);
        scratch.match_shape(&src);
        assert_eq!(scratch.channel_count(), 3);
        assert_eq!(scratch.frames(), 64);
    }
}
