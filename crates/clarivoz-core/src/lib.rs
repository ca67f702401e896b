//! Clarivoz Core - DSP primitives for real-time voice enhancement
//!
//! This crate provides the foundational building blocks for the clarivoz
//! block-synchronous processing units, designed for real-time audio callbacks
//! with zero allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Block Processing
//!
//! - [`AudioBlock`] - Multi-channel sample buffer, preallocated and reused
//! - [`BlockProcessor`] - Trait for per-block processing units
//! - [`Chain`] - Two processors in series with a preallocated mid buffer
//!
//! ## Circular Buffers
//!
//! - [`RingBuffer`] - Fixed-capacity sample FIFO with offset peeking
//! - [`OverlapAddRing`] - Accumulating output ring with a parallel
//!   window-sum array and a frontier cursor for overlap-add synthesis
//!
//! ## Synthesis & Dynamics Helpers
//!
//! - [`GrainWindow`] - Precomputed Hann envelope for grain synthesis
//! - [`BlockGainSmoother`] - Block-rate attack/release gain smoothing
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`linear_to_db`], [`level_to_db`],
//!   [`block_rms`], [`ms_to_samples`]
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded deployments. Disable the
//! default `std` feature:
//!
//! ```toml
//! [dependencies]
//! clarivoz-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths; all
//!   buffers are sized at construction and reused
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Absorb, don't raise**: degenerate audio input is bypassed, parameter
//!   excursions are clamped; only construction can fail

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod block;
pub mod math;
pub mod processor;
pub mod ring;
pub mod smoother;
pub mod window;

// Re-export main types at crate root
pub use block::AudioBlock;
pub use math::{LEVEL_FLOOR_DB, block_rms, db_to_linear, level_to_db, linear_to_db, ms_to_samples};
pub use processor::{BlockProcessor, Chain};
pub use ring::{OverlapAddRing, RingBuffer};
pub use smoother::BlockGainSmoother;
pub use window::GrainWindow;
