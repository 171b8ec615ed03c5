//! HTTP forwarding shim host.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!  invocation event  │                 FORWARDING SHIM              │
//!  ──────────────────┼─▶ http::server ─▶ proxy::handler             │
//!                    │                      │                       │
//!                    │                      ▼                       │
//!                    │               proxy::translator              │
//!                    │                      │  OutboundRequest      │
//!                    │                      ▼                       │
//!  outbound envelope │               proxy::forwarder ──────────────┼──▶ Origin
//!  ◀─────────────────┼── envelope ◀─────────┘  (10s deadline)       │
//!                    │                                              │
//!                    │   config · observability · lifecycle        │
//!                    └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use http_forward_shim::config::loader::load_or_default;
use http_forward_shim::lifecycle::{signals, startup, Shutdown};
use http_forward_shim::observability::logging::init_logging;
use http_forward_shim::HttpServer;

#[derive(Parser)]
#[command(name = "http-forward-shim")]
#[command(about = "Forward JSON-described HTTP requests to their origin", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, env = "SHIM_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_or_default(args.config.as_deref())?;

    init_logging(&config.observability)?;

    tracing::info!("http-forward-shim v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        timeout_ms = config.forwarder.timeout_ms,
        "Configuration loaded"
    );

    let handler = startup::init(&config)?;

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_shutdown_signal().await;
        trigger.trigger();
    });

    let server = HttpServer::new(handler, &config.listener);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
