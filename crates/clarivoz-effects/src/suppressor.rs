//! One interface over both noise suppression strategies.
//!
//! The product shipped two suppression designs over its lifetime: the hard
//! hysteresis [`NoiseGate`] and the soft-knee [`DownwardExpander`]. Rather
//! than bless one, both are kept behind [`NoiseSuppressor`] and the active
//! strategy is selected at runtime from the control plane. Each strategy
//! keeps its own runtime state, so switching back and forth does not lose
//! parameter settings.

use crate::{DownwardExpander, NoiseGate};
use clarivoz_core::{AudioBlock, BlockProcessor};

/// Which suppression strategy is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressorKind {
    /// Hard gate with hysteresis and hold.
    Gate,
    /// Soft-knee downward expander.
    Expander,
}

/// Runtime-selectable noise suppression stage.
///
/// # Example
///
/// ```rust
/// use clarivoz_core::{AudioBlock, BlockProcessor};
/// use clarivoz_effects::{NoiseSuppressor, SuppressorKind};
///
/// let mut suppressor = NoiseSuppressor::new(48000.0);
/// assert_eq!(suppressor.kind(), SuppressorKind::Gate);
/// suppressor.select(SuppressorKind::Expander);
///
/// let input = AudioBlock::new(1, 128);
/// let mut output = AudioBlock::new(1, 128);
/// assert!(suppressor.process(&input, &mut output));
/// ```
#[derive(Debug, Clone)]
pub struct NoiseSuppressor {
    gate: NoiseGate,
    expander: DownwardExpander,
    active: SuppressorKind,
}

impl NoiseSuppressor {
    /// Create a suppressor with the gate strategy active.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            gate: NoiseGate::new(sample_rate),
            expander: DownwardExpander::new(sample_rate),
            active: SuppressorKind::Gate,
        }
    }

    /// Currently active strategy.
    pub fn kind(&self) -> SuppressorKind {
        self.active
    }

    /// Switch the active strategy.
    ///
    /// The incoming strategy is reset so it ramps in from a clean state
    /// instead of resuming a stale gain.
    pub fn select(&mut self, kind: SuppressorKind) {
        if kind == self.active {
            return;
        }
        self.active = kind;
        match kind {
            SuppressorKind::Gate => self.gate.reset(),
            SuppressorKind::Expander => self.expander.reset(),
        }
    }

    /// The gate strategy, for parameter routing.
    pub fn gate(&self) -> &NoiseGate {
        &self.gate
    }

    /// Mutable access to the gate strategy.
    pub fn gate_mut(&mut self) -> &mut NoiseGate {
        &mut self.gate
    }

    /// The expander strategy, for parameter routing.
    pub fn expander(&self) -> &DownwardExpander {
        &self.expander
    }

    /// Mutable access to the expander strategy.
    pub fn expander_mut(&mut self) -> &mut DownwardExpander {
        &mut self.expander
    }
}

impl BlockProcessor for NoiseSuppressor {
    fn process(&mut self, input: &AudioBlock, output: &mut AudioBlock) -> bool {
        match self.active {
            SuppressorKind::Gate => self.gate.process(input, output),
            SuppressorKind::Expander => self.expander.process(input, output),
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.gate.set_sample_rate(sample_rate);
        self.expander.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.gate.reset();
        self.expander.reset();
    }
}
