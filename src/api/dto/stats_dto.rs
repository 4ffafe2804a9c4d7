//! Response bodies for the monitoring endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::config::HarnessConfig;
use crate::hub::HubStats;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests.
    pub status: String,
    /// RFC 3339 server time.
    pub timestamp: String,
    /// Crate version.
    pub version: String,
}

/// Hub counters plus the load shape they were produced under.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    /// Membership and broadcast counters.
    #[serde(flatten)]
    pub hub: HubStats,
    /// Configured time between broadcasts, in milliseconds.
    pub broadcast_period_ms: u64,
    /// Configured filler block size, in bytes.
    pub payload_size_bytes: usize,
    /// Configured per-connection mailbox capacity.
    pub mailbox_capacity: usize,
}

impl StatsResponse {
    /// Combines a hub snapshot with the running configuration.
    #[must_use]
    pub fn new(hub: HubStats, config: &HarnessConfig) -> Self {
        Self {
            hub,
            broadcast_period_ms: u64::try_from(config.broadcast_period.as_millis())
                .unwrap_or(u64::MAX),
            payload_size_bytes: config.payload_size,
            mailbox_capacity: config.mailbox_capacity,
        }
    }
}
