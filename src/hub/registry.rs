//! Connection registry and broadcast hub.
//!
//! [`Hub`] owns the live set and runs a single coordination loop. Every
//! membership change and every broadcast arrives as a [`HubCommand`] on
//! one bounded queue, so the set is never mutated concurrently and a
//! connection is never targeted after its removal was processed.
//! [`HubHandle`] is the cloneable submission side.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::mailbox::{EnqueueOutcome, Mailbox};
use super::stats::HubStats;
use crate::domain::{ConnectionId, Payload};
use crate::error::HarnessError;

/// What the hub keeps for one registered connection.
#[derive(Debug)]
pub struct Member {
    /// Identity of the connection.
    pub id: ConnectionId,
    /// Producer half of the connection's mailbox.
    pub mailbox: Mailbox,
}

/// Control events processed by the coordination loop, in submission order.
#[derive(Debug)]
enum HubCommand {
    Register(Member, oneshot::Sender<()>),
    Unregister(ConnectionId, oneshot::Sender<()>),
    Broadcast(Arc<Payload>),
    Stats(oneshot::Sender<HubStats>),
}

/// The single authority over the live connection set.
#[derive(Debug)]
pub struct Hub {
    members: HashMap<ConnectionId, Mailbox>,
    commands: mpsc::Receiver<HubCommand>,
    live: Arc<AtomicUsize>,
    stats: HubStats,
}

/// Cloneable handle used to submit events to the [`Hub`].
#[derive(Debug, Clone)]
pub struct HubHandle {
    commands: mpsc::Sender<HubCommand>,
    live: Arc<AtomicUsize>,
}

impl Hub {
    /// Creates a hub and its handle. The hub does nothing until
    /// [`Hub::run`] is polled.
    ///
    /// # Panics
    ///
    /// Panics if `queue_capacity` is zero.
    #[must_use]
    pub fn new(queue_capacity: usize) -> (Self, HubHandle) {
        let (tx, rx) = mpsc::channel(queue_capacity);
        let live = Arc::new(AtomicUsize::new(0));
        let hub = Self {
            members: HashMap::new(),
            commands: rx,
            live: Arc::clone(&live),
            stats: HubStats::default(),
        };
        (hub, HubHandle { commands: tx, live })
    }

    /// Creates a hub and spawns its coordination loop on the runtime.
    ///
    /// # Panics
    ///
    /// Panics if `queue_capacity` is zero.
    #[must_use]
    pub fn spawn(queue_capacity: usize) -> (HubHandle, JoinHandle<()>) {
        let (hub, handle) = Self::new(queue_capacity);
        (handle, tokio::spawn(hub.run()))
    }

    /// Runs the coordination loop until every [`HubHandle`] is dropped.
    ///
    /// Dropping the hub drops every remaining mailbox, which closes the
    /// outbound pumps of any connections still attached.
    pub async fn run(mut self) {
        tracing::debug!("hub coordination loop started");
        while let Some(command) = self.commands.recv().await {
            self.handle(command);
        }
        tracing::debug!(live = self.members.len(), "hub coordination loop stopped");
    }

    fn handle(&mut self, command: HubCommand) {
        match command {
            HubCommand::Register(member, ack) => {
                self.register(member);
                let _ = ack.send(());
            }
            HubCommand::Unregister(id, ack) => {
                self.unregister(id);
                let _ = ack.send(());
            }
            HubCommand::Broadcast(payload) => self.broadcast(&payload),
            HubCommand::Stats(reply) => {
                let _ = reply.send(self.stats);
            }
        }
    }

    fn register(&mut self, member: Member) {
        match self.members.entry(member.id) {
            Entry::Occupied(_) => {
                tracing::warn!(connection_id = %member.id, "connection already registered");
            }
            Entry::Vacant(slot) => {
                slot.insert(member.mailbox);
                self.stats.total_registered += 1;
                self.sync_live();
                tracing::info!(
                    connection_id = %member.id,
                    live = self.stats.live,
                    "client connected"
                );
            }
        }
    }

    fn unregister(&mut self, id: ConnectionId) {
        self.stats.unregister_requests += 1;
        // Dropping the mailbox closes it; the outbound pump finishes the
        // teardown from there.
        if self.members.remove(&id).is_some() {
            self.stats.total_unregistered += 1;
            self.sync_live();
            tracing::info!(connection_id = %id, live = self.stats.live, "client disconnected");
        } else {
            tracing::trace!(connection_id = %id, "unregister for unknown connection ignored");
        }
    }

    fn broadcast(&mut self, payload: &Arc<Payload>) {
        self.stats.broadcasts += 1;
        for (id, mailbox) in &self.members {
            match mailbox.enqueue(payload) {
                EnqueueOutcome::Queued => self.stats.deliveries += 1,
                EnqueueOutcome::Dropped => {
                    self.stats.drops += 1;
                    tracing::trace!(connection_id = %id, "mailbox full, payload dropped");
                }
                EnqueueOutcome::Closed => {
                    self.stats.drops += 1;
                    tracing::trace!(connection_id = %id, "mailbox closed, removal pending");
                }
            }
        }
    }

    fn sync_live(&mut self) {
        self.stats.live = self.members.len();
        self.live.store(self.stats.live, Ordering::Release);
    }
}

impl HubHandle {
    /// Admits a connection into the live set.
    ///
    /// Returns once the loop has applied the change, so [`Self::live_count`]
    /// and any later broadcast already include the connection. Registering
    /// an id twice keeps the first mailbox.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::HubClosed`] if the coordination loop is gone.
    pub async fn register(&self, member: Member) -> Result<(), HarnessError> {
        let (ack, applied) = oneshot::channel();
        self.submit(HubCommand::Register(member, ack)).await?;
        applied.await.map_err(|_| HarnessError::HubClosed)
    }

    /// Removes a connection from the live set. No-op if it is absent.
    ///
    /// Returns once the loop has applied the removal.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::HubClosed`] if the coordination loop is gone.
    pub async fn unregister(&self, id: ConnectionId) -> Result<(), HarnessError> {
        let (ack, applied) = oneshot::channel();
        self.submit(HubCommand::Unregister(id, ack)).await?;
        applied.await.map_err(|_| HarnessError::HubClosed)
    }

    /// Offers `payload` to every live connection's mailbox.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::HubClosed`] if the coordination loop is gone.
    pub async fn broadcast(&self, payload: Arc<Payload>) -> Result<(), HarnessError> {
        self.submit(HubCommand::Broadcast(payload)).await
    }

    /// Returns counters as of every previously submitted command.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::HubClosed`] if the coordination loop is gone.
    pub async fn stats(&self) -> Result<HubStats, HarnessError> {
        let (tx, rx) = oneshot::channel();
        self.submit(HubCommand::Stats(tx)).await?;
        rx.await.map_err(|_| HarnessError::HubClosed)
    }

    /// Point-in-time size of the live set. Lock-free.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    /// Returns `true` once the coordination loop has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn submit(&self, command: HubCommand) -> Result<(), HarnessError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| HarnessError::HubClosed)
    }
}
