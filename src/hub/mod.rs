//! Hub layer: the live connection set, its coordination loop and the
//! per-connection mailboxes it feeds.
//!
//! Membership changes and broadcasts are serialized through one queue
//! instead of a lock around the set. See [`registry`] for the loop.

pub mod mailbox;
pub mod registry;
pub mod stats;

pub use mailbox::{EnqueueOutcome, Mailbox, MailboxReceiver, mailbox};
pub use registry::{Hub, HubHandle, Member};
pub use stats::HubStats;
