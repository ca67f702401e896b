//! Per-stream enhancement session.
//!
//! An [`EnhancerSession`] is created once per active audio stream. It owns
//! the suppressor → pitch shifter chain and the receiving end of the
//! control channel, and it is driven entirely by the host's block callback:
//! pending control messages are applied first, then the chain runs. That
//! ordering is what makes every update an all-or-nothing snapshot taking
//! effect exactly at a block boundary, never mid-block.

use crate::mailbox::{ControlMailbox, ControlSender, DEFAULT_CAPACITY, control_channel};
use crate::message::ControlMessage;
use crate::settings::EnhancerSettings;
use clarivoz_core::{AudioBlock, BlockProcessor, Chain};
use clarivoz_effects::{NoiseSuppressor, PitchConfigError, PitchShifter};
use tracing::debug;

/// One stream's enhancement pipeline plus its control mailbox.
///
/// # Example
///
/// ```rust
/// use clarivoz_control::{ControlMessage, EnhancerSession};
/// use clarivoz_core::AudioBlock;
///
/// let (mut session, sender) = EnhancerSession::new(48000.0, 2, 1024).unwrap();
/// sender.send(ControlMessage::SetPitch { target_ratio: Some(1.5) });
///
/// let input = AudioBlock::new(2, 128);
/// let mut output = AudioBlock::new(2, 128);
/// assert!(session.process_block(&input, &mut output));
/// assert_eq!(session.pitch().target_ratio(), 1.5);
/// ```
pub struct EnhancerSession {
    chain: Chain<NoiseSuppressor, PitchShifter>,
    mailbox: ControlMailbox,
}

impl EnhancerSession {
    /// Create a session and its control sender.
    ///
    /// `max_channels` and `max_frames` size the chain's scratch buffer for
    /// the largest block shape the host will deliver. Construction is the
    /// only fallible step; once a session exists, processing never errors.
    pub fn new(
        sample_rate: f32,
        max_channels: usize,
        max_frames: usize,
    ) -> Result<(Self, ControlSender), PitchConfigError> {
        let suppressor = NoiseSuppressor::new(sample_rate);
        let shifter = PitchShifter::with_defaults(sample_rate)?;
        let (sender, mailbox) = control_channel(DEFAULT_CAPACITY);
        Ok((
            Self {
                chain: Chain::new(suppressor, shifter, max_channels, max_frames),
                mailbox,
            },
            sender,
        ))
    }

    /// Process one block, applying any pending control messages first.
    ///
    /// Returns the chain's keep-alive flag; the host keeps invoking the
    /// session for as long as it returns `true`.
    pub fn process_block(&mut self, input: &AudioBlock, output: &mut AudioBlock) -> bool {
        while let Some(message) = self.mailbox.try_recv() {
            self.apply(message);
        }
        self.chain.process(input, output)
    }

    /// Apply one control message to the owned units.
    ///
    /// Values are clamped by the unit setters; fields the message does not
    /// carry are left untouched.
    pub fn apply(&mut self, message: ControlMessage) {
        debug!(?message, "applying control message");
        match message {
            ControlMessage::SetGate {
                enabled,
                threshold_db,
                hysteresis_db,
                reduction_db,
                attack_ms,
                release_ms,
                hold_ms,
            } => {
                let gate = self.chain.first_mut().gate_mut();
                if let Some(v) = enabled {
                    gate.set_enabled(v);
                }
                if let Some(v) = threshold_db {
                    gate.set_threshold_db(v);
                }
                if let Some(v) = hysteresis_db {
                    gate.set_hysteresis_db(v);
                }
                if let Some(v) = reduction_db {
                    gate.set_reduction_db(v);
                }
                if let Some(v) = attack_ms {
                    gate.set_attack_ms(v);
                }
                if let Some(v) = release_ms {
                    gate.set_release_ms(v);
                }
                if let Some(v) = hold_ms {
                    gate.set_hold_ms(v);
                }
            }
            ControlMessage::SetExpander {
                enabled,
                threshold_db,
                knee_db,
                ratio,
                reduction_db,
                attack_ms,
                release_ms,
            } => {
                let expander = self.chain.first_mut().expander_mut();
                if let Some(v) = enabled {
                    expander.set_enabled(v);
                }
                if let Some(v) = threshold_db {
                    expander.set_threshold_db(v);
                }
                if let Some(v) = knee_db {
                    expander.set_knee_db(v);
                }
                if let Some(v) = ratio {
                    expander.set_ratio(v);
                }
                if let Some(v) = reduction_db {
                    expander.set_reduction_db(v);
                }
                if let Some(v) = attack_ms {
                    expander.set_attack_ms(v);
                }
                if let Some(v) = release_ms {
                    expander.set_release_ms(v);
                }
            }
            ControlMessage::SetPitch { target_ratio } => {
                if let Some(v) = target_ratio {
                    self.chain.second_mut().set_target_ratio(v);
                }
            }
            ControlMessage::SelectStrategy { strategy } => {
                if let Some(s) = strategy {
                    self.chain.first_mut().select(s.into());
                }
            }
        }
    }

    /// Capture the current settings for the persistence layer.
    pub fn snapshot(&self) -> EnhancerSettings {
        let suppressor = self.chain.first();
        let gate = suppressor.gate();
        let expander = suppressor.expander();
        EnhancerSettings {
            strategy: suppressor.kind().into(),
            gate: crate::settings::GateSettings {
                enabled: gate.enabled(),
                threshold_db: gate.threshold_db(),
                hysteresis_db: gate.hysteresis_db(),
                reduction_db: gate.reduction_db(),
                attack_ms: gate.attack_ms(),
                release_ms: gate.release_ms(),
                hold_ms: gate.hold_ms(),
            },
            expander: crate::settings::ExpanderSettings {
                enabled: expander.enabled(),
                threshold_db: expander.threshold_db(),
                knee_db: expander.knee_db(),
                ratio: expander.ratio(),
                reduction_db: expander.reduction_db(),
                attack_ms: expander.attack_ms(),
                release_ms: expander.release_ms(),
            },
            pitch: crate::settings::PitchSettings {
                target_ratio: self.chain.second().target_ratio(),
            },
        }
    }

    /// Replay a stored snapshot, clamping values through the unit setters.
    pub fn restore(&mut self, settings: &EnhancerSettings) {
        debug!(strategy = ?settings.strategy, "restoring session settings");
        let suppressor = self.chain.first_mut();
        let gate = suppressor.gate_mut();
        gate.set_enabled(settings.gate.enabled);
        gate.set_threshold_db(settings.gate.threshold_db);
        gate.set_hysteresis_db(settings.gate.hysteresis_db);
        gate.set_reduction_db(settings.gate.reduction_db);
        gate.set_attack_ms(settings.gate.attack_ms);
        gate.set_release_ms(settings.gate.release_ms);
        gate.set_hold_ms(settings.gate.hold_ms);

        let expander = suppressor.expander_mut();
        expander.set_enabled(settings.expander.enabled);
        expander.set_threshold_db(settings.expander.threshold_db);
        expander.set_knee_db(settings.expander.knee_db);
        expander.set_ratio(settings.expander.ratio);
        expander.set_reduction_db(settings.expander.reduction_db);
        expander.set_attack_ms(settings.expander.attack_ms);
        expander.set_release_ms(settings.expander.release_ms);

        suppressor.select(settings.strategy.into());
        self.chain
            .second_mut()
            .set_target_ratio(settings.pitch.target_ratio);
    }

    /// The suppression stage, for inspection.
    pub fn suppressor(&self) -> &NoiseSuppressor {
        self.chain.first()
    }

    /// The pitch stage, for inspection.
    pub fn pitch(&self) -> &PitchShifter {
        self.chain.second()
    }

    /// Total algorithmic latency of the chain in samples.
    pub fn latency_samples(&self) -> usize {
        self.chain.latency_samples()
    }

    /// Propagate a host sample-rate change to both units.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.chain.set_sample_rate(sample_rate);
    }

    /// Clear all runtime state while keeping parameters.
    pub fn reset(&mut self) {
        self.chain.reset();
    }
}
