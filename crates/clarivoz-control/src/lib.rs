//! Clarivoz Control - the boundary between UI and audio
//!
//! The enhancement units run on the host's real-time audio callback; the
//! dashboard that configures them runs somewhere else entirely. This crate
//! owns everything that crosses that boundary:
//!
//! - [`ControlMessage`] - tagged parameter updates, decoded leniently from
//!   the UI's JSON (absent or mistyped fields are ignored, values are
//!   clamped before they reach processing state)
//! - [`ControlSender`] / [`ControlMailbox`] - a bounded single-producer
//!   single-consumer handoff; the control side never blocks the audio side
//! - [`EnhancerSession`] - owns the suppressor → pitch shifter chain and
//!   applies pending messages only at block boundaries, so every update
//!   lands as an all-or-nothing snapshot between blocks
//! - [`EnhancerSettings`] - serializable snapshot of the last applied
//!   settings, replayed on session restore by the persistence layer
//!
//! ## Example
//!
//! ```rust
//! use clarivoz_control::{ControlMessage, EnhancerSession};
//! use clarivoz_core::AudioBlock;
//!
//! let (mut session, sender) = EnhancerSession::new(48000.0, 2, 1024).unwrap();
//!
//! // Control thread: parse a UI message and hand it off
//! let message = ControlMessage::from_json(r#"{"op":"set_pitch","target_ratio":1.5}"#).unwrap();
//! sender.send(message);
//!
//! // Audio thread: the message applies before the next block
//! let input = AudioBlock::new(2, 128);
//! let mut output = AudioBlock::new(2, 128);
//! assert!(session.process_block(&input, &mut output));
//! ```

pub mod mailbox;
pub mod message;
pub mod session;
pub mod settings;

pub use mailbox::{ControlMailbox, ControlSender, control_channel};
pub use message::{ControlError, ControlMessage, Strategy};
pub use session::EnhancerSession;
pub use settings::{EnhancerSettings, ExpanderSettings, GateSettings, PitchSettings};
