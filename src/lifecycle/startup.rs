//! Startup orchestration.
//!
//! Builds the process-wide HTTP client exactly once and wires it into the
//! handler. Everything built here is immutable for the life of the process.

use thiserror::Error;

use crate::config::loader::ConfigError;
use crate::config::ShimConfig;
use crate::observability::metrics;
use crate::proxy::forwarder::build_client;
use crate::proxy::ProxyHandler;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Initialize subsystems in dependency order and return the handler.
pub fn init(config: &ShimConfig) -> Result<ProxyHandler, StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = build_client(&config.forwarder)?;
    let handler = ProxyHandler::from_config(&config.forwarder, client)?;

    tracing::info!(
        timeout_ms = config.forwarder.timeout_ms,
        base_url = config.forwarder.base_url.as_deref().unwrap_or("-"),
        "Forwarder ready"
    );
    Ok(handler)
}
