//! Per-connection bounded outbound queue.
//!
//! The hub is the only producer and the connection's outbound pump the
//! only consumer. [`Mailbox::enqueue`] never blocks: when the queue is
//! full the new payload is dropped for that recipient (drop-newest).

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::Payload;

/// Result of offering a payload to one mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    /// The payload was queued for delivery.
    Queued,
    /// The mailbox was full; this payload was dropped for this recipient.
    Dropped,
    /// The consuming pump has already exited.
    Closed,
}

/// Producer half of a connection mailbox. Held only by the hub.
///
/// Dropping it closes the mailbox, which tells the outbound pump to send
/// a close frame and exit once the queued payloads are written.
#[derive(Debug)]
pub struct Mailbox {
    tx: mpsc::Sender<Arc<Payload>>,
}

/// Consumer half of a connection mailbox. Owned by the outbound pump.
#[derive(Debug)]
pub struct MailboxReceiver {
    rx: mpsc::Receiver<Arc<Payload>>,
}

/// Creates a mailbox holding at most `capacity` payloads.
///
/// # Panics
///
/// Panics if `capacity` is zero; configuration loading rejects that value.
#[must_use]
pub fn mailbox(capacity: usize) -> (Mailbox, MailboxReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (Mailbox { tx }, MailboxReceiver { rx })
}

impl Mailbox {
    /// Offers `payload` without waiting.
    pub fn enqueue(&self, payload: &Arc<Payload>) -> EnqueueOutcome {
        match self.tx.try_send(Arc::clone(payload)) {
            Ok(()) => EnqueueOutcome::Queued,
            Err(TrySendError::Full(_)) => EnqueueOutcome::Dropped,
            Err(TrySendError::Closed(_)) => EnqueueOutcome::Closed,
        }
    }
}

impl MailboxReceiver {
    /// Waits for the next payload. `None` once the mailbox is closed and
    /// drained.
    pub async fn recv(&mut self) -> Option<Arc<Payload>> {
        self.rx.recv().await
    }

    /// Takes a queued payload if one is ready.
    pub fn try_recv(&mut self) -> Option<Arc<Payload>> {
        self.rx.try_recv().ok()
    }
}
