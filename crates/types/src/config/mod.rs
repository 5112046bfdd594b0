// Path: crates/types/src/config/mod.rs

//! Client configuration shared by the library and the CLI.
use crate::error::LeaseError;
use crate::schema::SchemaVariant;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Connection and watch settings for a ledger client.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// JSON-RPC endpoint of the ledger node.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Seconds to wait for a terminal transaction status. `0` waits indefinitely.
    #[serde(default = "default_status_timeout_secs")]
    pub status_timeout_secs: u64,
    /// Interval between status polls.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Timeout of a single RPC request.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Schema variant the client decodes with.
    #[serde(default)]
    pub schema: SchemaVariant,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:9933".to_string()
}
fn default_status_timeout_secs() -> u64 {
    120
}
fn default_poll_interval_ms() -> u64 {
    500
}
fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            status_timeout_secs: default_status_timeout_secs(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            schema: SchemaVariant::default(),
        }
    }
}

impl ClientConfig {
    /// Loads a configuration from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, LeaseError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            LeaseError::Validation(format!("cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, LeaseError> {
        Ok(toml::from_str(text)?)
    }

    /// The status watch deadline, or `None` to wait indefinitely.
    pub fn status_timeout(&self) -> Option<Duration> {
        (self.status_timeout_secs > 0).then(|| Duration::from_secs(self.status_timeout_secs))
    }

    /// The interval between status polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// The timeout applied to each RPC request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}
