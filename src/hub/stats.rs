//! Point-in-time counters maintained by the hub loop.

use serde::Serialize;
use utoipa::ToSchema;

/// Snapshot of hub membership and broadcast counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct HubStats {
    /// Connections currently in the live set.
    pub live: usize,
    /// Connections admitted since startup.
    pub total_registered: u64,
    /// Connections removed since startup.
    pub total_unregistered: u64,
    /// Unregister requests received, including duplicates and unknown ids.
    pub unregister_requests: u64,
    /// Broadcasts processed since startup.
    pub broadcasts: u64,
    /// Payloads placed into a mailbox.
    pub deliveries: u64,
    /// Payloads dropped because a mailbox was full or already closed.
    pub drops: u64,
}
