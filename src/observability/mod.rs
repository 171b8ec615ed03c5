//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handler / forwarder / host produce:
//!     → logging.rs (structured log events, request ID span field)
//!     → metrics.rs (invocation outcomes, origin latency)
//!
//! Consumers:
//!     → Log aggregation (stdout, pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, off by default)
//! ```

pub mod logging;
pub mod metrics;
