//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the shim.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::proxy::translator::DEFAULT_CONTENT_TYPE;

/// Root configuration for the forwarding shim.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ShimConfig {
    /// Local invocation host settings.
    pub listener: ListenerConfig,

    /// Origin forwarding settings.
    pub forwarder: ForwarderConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration for the local invocation host.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:9000").
    pub bind_address: String,

    /// Largest invocation event accepted, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:9000".to_string(),
            max_body_bytes: 6 * 1024 * 1024,
        }
    }
}

/// Origin forwarding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwarderConfig {
    /// Budget for one origin exchange (send, headers and body) in milliseconds.
    pub timeout_ms: u64,

    /// Base URL for relative `requestUri` values.
    pub base_url: Option<String>,

    /// Content type for bodies sent without an explicit `Content-Type`.
    pub default_content_type: String,

    /// How long idle pooled connections are kept, in seconds.
    pub pool_idle_timeout_secs: u64,

    /// User-Agent sent to origins (none by default).
    pub user_agent: Option<String>,
}

impl ForwarderConfig {
    /// Parsed base URL, if one is configured.
    pub fn base_url(&self) -> Result<Option<Url>, url::ParseError> {
        self.base_url.as_deref().map(Url::parse).transpose()
    }
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            base_url: None,
            default_content_type: DEFAULT_CONTENT_TYPE.to_string(),
            pool_idle_timeout_secs: 90,
            user_agent: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
