//! One upgraded WebSocket connection and its two pumps.
//!
//! The inbound pump drains peer reads until close or error. The outbound
//! pump drains the mailbox into the socket until the mailbox closes or a
//! write fails. Whichever side observes termination first flips the
//! connection's liveness flag and submits the single unregister request.
//! The outbound pump owns the sink and closes it exactly once.

use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::ws::{Message, close_code};
use futures_util::{Sink, SinkExt, Stream, StreamExt};

use crate::domain::ConnectionId;
use crate::error::HarnessError;
use crate::hub::{HubHandle, MailboxReceiver, Member, mailbox};

/// Why the inbound pump stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundExit {
    /// The peer sent a close frame.
    PeerClosed,
    /// Reading from the stream failed.
    ReadFailed,
    /// The stream ended without a close frame.
    StreamEnded,
}

/// Why the outbound pump stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundExit {
    /// The hub dropped the mailbox; a close frame was sent.
    MailboxClosed,
    /// Writing to the sink failed.
    WriteFailed,
}

/// Identity and liveness shared by the two pumps of one connection.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    hub: HubHandle,
    live: AtomicBool,
}

impl Connection {
    /// Creates a live connection bound to `hub`.
    #[must_use]
    pub fn new(hub: HubHandle) -> Self {
        Self {
            id: ConnectionId::new(),
            hub,
            live: AtomicBool::new(true),
        }
    }

    /// The connection's identifier.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// `false` once either pump has observed termination.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Marks the connection dead and asks the hub to remove it.
    ///
    /// Only the first call submits a request; later calls return `false`.
    pub async fn request_unregister(&self) -> bool {
        if !self.mark_dead() {
            return false;
        }
        if let Err(e) = self.hub.unregister(self.id).await {
            tracing::debug!(connection_id = %self.id, error = %e, "unregister not delivered");
        }
        true
    }

    /// Flips liveness without contacting the hub. Returns `true` if this
    /// call made the transition.
    fn mark_dead(&self) -> bool {
        self.live.swap(false, Ordering::AcqRel)
    }
}

/// Reads from the peer until it closes or errors, then requests removal.
///
/// Application frames and pings are ignored.
pub async fn inbound_pump<R, E>(mut stream: R, conn: &Connection) -> InboundExit
where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let exit = loop {
        match stream.next().await {
            Some(Ok(Message::Close(frame))) => {
                match frame {
                    Some(cf) if cf.code != close_code::NORMAL && cf.code != close_code::AWAY => {
                        tracing::warn!(
                            connection_id = %conn.id(),
                            code = cf.code,
                            reason = cf.reason.as_str(),
                            "unexpected close from peer"
                        );
                    }
                    _ => tracing::debug!(connection_id = %conn.id(), "peer closed"),
                }
                break InboundExit::PeerClosed;
            }
            Some(Ok(_)) => {}
            Some(Err(e)) => {
                tracing::debug!(connection_id = %conn.id(), error = %e, "read failed");
                break InboundExit::ReadFailed;
            }
            None => {
                tracing::debug!(connection_id = %conn.id(), "stream ended");
                break InboundExit::StreamEnded;
            }
        }
    };
    conn.request_unregister().await;
    exit
}

/// Writes mailbox payloads as text frames until the mailbox closes or a
/// write fails. Closes the sink before returning.
pub async fn outbound_pump<S>(
    mut sink: S,
    mut mailbox: MailboxReceiver,
    conn: &Connection,
) -> OutboundExit
where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let exit = loop {
        let Some(payload) = mailbox.recv().await else {
            // Already out of the live set; nothing left to unregister.
            conn.mark_dead();
            let _ = sink.send(Message::Close(None)).await;
            break OutboundExit::MailboxClosed;
        };
        if let Err(e) = sink.send(Message::Text(payload.frame().clone())).await {
            if conn.is_live() {
                tracing::warn!(connection_id = %conn.id(), error = %e, "write failed");
            } else {
                // Queued payloads flushed after the peer already went away.
                tracing::debug!(connection_id = %conn.id(), error = %e, "write after close");
            }
            conn.request_unregister().await;
            break OutboundExit::WriteFailed;
        }
    };
    let _ = sink.close().await;
    exit
}

/// Registers a connection built from `sink` and `stream` and runs both
/// pumps to completion.
///
/// The outbound pump runs on its own task. If it finishes first the
/// inbound pump is dropped, so no task outlives the connection.
///
/// # Errors
///
/// Returns [`HarnessError::HubClosed`] if the connection could not be
/// registered; the pumps are not started in that case.
pub async fn serve_connection<S, R, E>(
    sink: S,
    stream: R,
    hub: HubHandle,
    mailbox_capacity: usize,
) -> Result<(), HarnessError>
where
    S: Sink<Message> + Unpin + Send + 'static,
    S::Error: Display + Send,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display + Send,
{
    let (tx, rx) = mailbox(mailbox_capacity);
    let conn = Arc::new(Connection::new(hub.clone()));
    let id = conn.id();

    hub.register(Member { id, mailbox: tx }).await?;

    let outbound_conn = Arc::clone(&conn);
    let mut outbound =
        tokio::spawn(async move { outbound_pump(sink, rx, &outbound_conn).await });

    tokio::select! {
        result = &mut outbound => {
            tracing::debug!(connection_id = %id, exit = ?result.ok(), "outbound pump exited first");
        }
        inbound = inbound_pump(stream, &conn) => {
            let outbound = outbound.await.ok();
            tracing::debug!(connection_id = %id, ?inbound, ?outbound, "connection torn down");
        }
    }
    Ok(())
}
