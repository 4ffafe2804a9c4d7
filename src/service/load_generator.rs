//! Periodic synthetic broadcast producer.
//!
//! Every period the generator captures the hub's live count, builds one
//! [`Payload`] around a pre-allocated filler block and submits it for
//! broadcast. Ticks missed while the runtime is busy are skipped, not
//! replayed.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::config::HarnessConfig;
use crate::domain::{Filler, Payload};
use crate::error::HarnessError;
use crate::hub::HubHandle;

/// Fixed-period producer of large broadcast payloads.
#[derive(Debug)]
pub struct LoadGenerator {
    hub: HubHandle,
    period: Duration,
    filler: Filler,
}

impl LoadGenerator {
    /// Creates a generator broadcasting `payload_size` filler bytes every
    /// `period`.
    #[must_use]
    pub fn new(hub: HubHandle, period: Duration, payload_size: usize) -> Self {
        Self {
            hub,
            period,
            filler: Filler::new(payload_size),
        }
    }

    /// Creates a generator from the loaded configuration.
    #[must_use]
    pub fn from_config(hub: HubHandle, config: &HarnessConfig) -> Self {
        Self::new(hub, config.broadcast_period, config.payload_size)
    }

    /// Builds one payload and submits it for broadcast.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::HubClosed`] if the hub is gone.
    pub async fn tick(&self) -> Result<Arc<Payload>, HarnessError> {
        let payload = Arc::new(Payload::build(
            Utc::now(),
            self.hub.live_count(),
            &self.filler,
        ));
        self.hub.broadcast(Arc::clone(&payload)).await?;
        Ok(payload)
    }

    /// Ticks forever. Returns only if the hub stops accepting broadcasts.
    pub async fn run(self) {
        let mut interval = tokio::time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tracing::info!(
            period_ms = u64::try_from(self.period.as_millis()).unwrap_or(u64::MAX),
            payload_size = self.filler.len(),
            "load generator started"
        );

        loop {
            interval.tick().await;
            match self.tick().await {
                Ok(payload) => {
                    tracing::debug!(
                        generated_at = %payload.generated_at(),
                        live = payload.live_count(),
                        bytes = payload.len(),
                        "broadcast submitted"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "load generator stopping");
                    break;
                }
            }
        }
    }

    /// Spawns [`LoadGenerator::run`] on the runtime.
    #[must_use]
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::ConnectionId;
    use crate::hub::{Hub, Member, mailbox};

    #[tokio::test]
    async fn tick_annotates_live_count_and_size() {
        let (hub, _task) = Hub::spawn(8);
        let (tx, mut rx) = mailbox(4);
        let _ = hub
            .register(Member {
                id: ConnectionId::new(),
                mailbox: tx,
            })
            .await;
        let _ = hub.stats().await;

        let generator = LoadGenerator::new(hub.clone(), Duration::from_secs(60), 128);
        let Ok(sent) = generator.tick().await else {
            panic!("tick should succeed");
        };
        assert_eq!(sent.live_count(), 1);
        assert_eq!(sent.filler_size(), 128);
        assert!(sent.header().contains("| Connected clients: 1 | Payload size: 128 bytes\n"));

        let _ = hub.stats().await;
        let Some(got) = rx.try_recv() else {
            panic!("registered mailbox should receive the payload");
        };
        assert!(Arc::ptr_eq(&got, &sent));
    }

    #[tokio::test]
    async fn run_broadcasts_periodically() {
        let (hub, _task) = Hub::spawn(8);
        let (tx, mut rx) = mailbox(8);
        let _ = hub
            .register(Member {
                id: ConnectionId::new(),
                mailbox: tx,
            })
            .await;

        let handle = LoadGenerator::new(hub.clone(), Duration::from_millis(10), 64).spawn();

        for _ in 0..2 {
            let received = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
            let Ok(Some(payload)) = received else {
                panic!("expected a periodic broadcast");
            };
            assert!(payload.header().contains("Payload size: 64 bytes"));
        }
        handle.abort();
    }

    #[tokio::test]
    async fn run_stops_when_hub_closes() {
        let (hub, handle) = Hub::new(2);
        drop(hub);
        let task = LoadGenerator::new(handle, Duration::from_millis(5), 8).spawn();
        let finished = tokio::time::timeout(Duration::from_secs(2), task).await;
        assert!(matches!(finished, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn from_config_uses_configured_size() {
        let (hub, _task) = Hub::spawn(2);
        let config = HarnessConfig {
            payload_size: 16,
            ..HarnessConfig::default()
        };
        let generator = LoadGenerator::from_config(hub, &config);
        let Ok(payload) = generator.tick().await else {
            panic!("tick should succeed");
        };
        assert_eq!(payload.filler_size(), 16);
    }
}
