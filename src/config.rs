//! Harness configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).
//!
//! | Key                   | Default        |
//! |-----------------------|----------------|
//! | `LISTEN_ADDR`         | `0.0.0.0:8088` |
//! | `BROADCAST_PERIOD_MS` | `1000`         |
//! | `PAYLOAD_SIZE_BYTES`  | `1048576`      |
//! | `MAILBOX_CAPACITY`    | `16`           |
//! | `HUB_QUEUE_CAPACITY`  | `1024`         |
//! | `WEB_ROOT`            | see [`resolve_web_root`] |

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::HarnessError;

/// Default bind address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8088";
/// Default time between broadcasts, in milliseconds.
pub const DEFAULT_BROADCAST_PERIOD_MS: u64 = 1_000;
/// Default filler block size: 1 MiB.
pub const DEFAULT_PAYLOAD_SIZE_BYTES: usize = 1024 * 1024;
/// Default per-connection mailbox capacity.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 16;
/// Default hub control-event queue capacity.
pub const DEFAULT_HUB_QUEUE_CAPACITY: usize = 1_024;

/// Top-level harness configuration.
///
/// Loaded once at startup via [`HarnessConfig::from_env`].
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// Time between two load-generator broadcasts.
    pub broadcast_period: Duration,

    /// Size of the filler block appended to every payload, in bytes.
    pub payload_size: usize,

    /// Capacity of each connection's outbound mailbox.
    pub mailbox_capacity: usize,

    /// Capacity of the hub's control-event queue.
    pub hub_queue_capacity: usize,

    /// Directory containing `web/templates` and `web/static`.
    pub web_root: PathBuf,
}

impl HarnessConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidConfig`] if `LISTEN_ADDR` is set but
    /// cannot be parsed, or if the period or a capacity is zero.
    /// Returns [`HarnessError::Io`] if the working directory is unreadable
    /// and `WEB_ROOT` is not set.
    pub fn from_env() -> Result<Self, HarnessError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`HarnessConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HarnessError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_addr: SocketAddr = lookup("LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
            .parse()
            .map_err(|e| HarnessError::InvalidConfig(format!("LISTEN_ADDR: {e}")))?;

        let period_ms = parse_value(&lookup, "BROADCAST_PERIOD_MS", DEFAULT_BROADCAST_PERIOD_MS);
        let payload_size = parse_value(&lookup, "PAYLOAD_SIZE_BYTES", DEFAULT_PAYLOAD_SIZE_BYTES);
        let mailbox_capacity = parse_value(&lookup, "MAILBOX_CAPACITY", DEFAULT_MAILBOX_CAPACITY);
        let hub_queue_capacity =
            parse_value(&lookup, "HUB_QUEUE_CAPACITY", DEFAULT_HUB_QUEUE_CAPACITY);

        if period_ms == 0 {
            return Err(HarnessError::InvalidConfig(
                "BROADCAST_PERIOD_MS must be greater than zero".to_string(),
            ));
        }
        if mailbox_capacity == 0 {
            return Err(HarnessError::InvalidConfig(
                "MAILBOX_CAPACITY must be greater than zero".to_string(),
            ));
        }
        if hub_queue_capacity == 0 {
            return Err(HarnessError::InvalidConfig(
                "HUB_QUEUE_CAPACITY must be greater than zero".to_string(),
            ));
        }

        let web_root = match lookup("WEB_ROOT") {
            Some(dir) => PathBuf::from(dir),
            None => resolve_web_root(&std::env::current_dir()?),
        };

        Ok(Self {
            listen_addr,
            broadcast_period: Duration::from_millis(period_ms),
            payload_size,
            mailbox_capacity,
            hub_queue_capacity,
            web_root,
        })
    }

    /// Path of the HTML client served at `/`.
    #[must_use]
    pub fn index_template(&self) -> PathBuf {
        self.web_root.join("web").join("templates").join("index.html")
    }

    /// Directory served under `/static`.
    #[must_use]
    pub fn static_dir(&self) -> PathBuf {
        self.web_root.join("web").join("static")
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8088)),
            broadcast_period: Duration::from_millis(DEFAULT_BROADCAST_PERIOD_MS),
            payload_size: DEFAULT_PAYLOAD_SIZE_BYTES,
            mailbox_capacity: DEFAULT_MAILBOX_CAPACITY,
            hub_queue_capacity: DEFAULT_HUB_QUEUE_CAPACITY,
            web_root: PathBuf::from("."),
        }
    }
}

/// Picks the project root from the working directory.
///
/// When started from `cmd/websocket-stress` the root is two levels up;
/// otherwise the working directory itself is used.
#[must_use]
pub fn resolve_web_root(working_dir: &Path) -> PathBuf {
    let in_cmd_dir = working_dir.file_name().is_some_and(|n| n == "websocket-stress")
        && working_dir
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|n| n == "cmd");

    match (in_cmd_dir, working_dir.parent().and_then(Path::parent)) {
        (true, Some(root)) => root.to_path_buf(),
        _ => working_dir.to_path_buf(),
    }
}

/// Parses a value as `T`, returning `default` on missing or invalid input.
fn parse_value<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
