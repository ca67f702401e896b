//! Clarivoz Effects - real-time voice enhancement units
//!
//! This crate provides the two block-synchronous processing units at the
//! heart of clarivoz, built on clarivoz-core:
//!
//! - [`NoiseGate`] - Hard gate with hysteresis and hold, for suppressing
//!   background noise between speech
//! - [`DownwardExpander`] - Soft-knee continuous attenuation below a
//!   threshold, the gentler alternative to the hard gate
//! - [`NoiseSuppressor`] - One interface over both suppression strategies,
//!   selectable at runtime
//! - [`PitchShifter`] - Granular time-domain pitch shifting with
//!   overlap-add resynthesis
//!
//! All units follow the same discipline: every buffer is allocated at
//! construction, `process` never allocates or blocks, degenerate input is
//! bypassed rather than rejected, and out-of-range parameters are clamped.
//!
//! ## Example
//!
//! ```rust
//! use clarivoz_core::{AudioBlock, BlockProcessor, Chain};
//! use clarivoz_effects::{NoiseGate, PitchShifter};
//!
//! let gate = NoiseGate::new(48000.0);
//! let shifter = PitchShifter::with_defaults(48000.0).unwrap();
//! let mut chain = Chain::new(gate, shifter, 2, 1024);
//!
//! let input = AudioBlock::new(2, 128);
//! let mut output = AudioBlock::new(2, 128);
//! assert!(chain.process(&input, &mut output));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod expander;
pub mod gate;
pub mod pitch;
pub mod suppressor;

// Re-export main types at crate root
pub use expander::DownwardExpander;
pub use gate::NoiseGate;
pub use pitch::{MAX_RATIO, MIN_RATIO, PitchConfigError, PitchShifter};
pub use suppressor::{NoiseSuppressor, SuppressorKind};
