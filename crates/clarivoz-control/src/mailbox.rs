//! Bounded control-to-audio message handoff.
//!
//! Parameter updates travel from the control thread to the audio callback
//! through a bounded channel with strictly non-blocking endpoints: the
//! sender drops messages when the queue is full, the receiver drains with
//! `try_recv` only. The audio callback is the sole consumer and applies
//! messages at block boundaries, so no lock is ever held while audio is
//! being processed.

use crate::message::ControlMessage;
use std::sync::mpsc::{Receiver, SyncSender, TryRecvError, sync_channel};

/// Default queue depth; generous for slider traffic at UI rates.
pub const DEFAULT_CAPACITY: usize = 64;

/// Control-thread endpoint: enqueues messages without ever blocking.
#[derive(Debug, Clone)]
pub struct ControlSender {
    tx: SyncSender<ControlMessage>,
}

impl ControlSender {
    /// Enqueue a message for the next block boundary.
    ///
    /// Returns `false` if the queue is full or the session is gone; the
    /// message is dropped in either case. A full queue means the audio side
    /// is not draining, and stalling the UI would not help it.
    pub fn send(&self, message: ControlMessage) -> bool {
        self.tx.try_send(message).is_ok()
    }
}

/// Audio-thread endpoint: drains pending messages at block boundaries.
#[derive(Debug)]
pub struct ControlMailbox {
    rx: Receiver<ControlMessage>,
}

impl ControlMailbox {
    /// Take the next pending message, if any. Never blocks.
    pub fn try_recv(&self) -> Option<ControlMessage> {
        match self.rx.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

/// Create a connected sender/mailbox pair with the given queue depth.
pub fn control_channel(capacity: usize) -> (ControlSender, ControlMailbox) {
    let (tx, rx) = sync_channel(capacity.max(1));
    (ControlSender { tx }, ControlMailbox { rx })
}
