//! Local invocation host.
//!
//! # Data Flow
//! ```text
//! POST /invoke (JSON invocation event)
//!     → server.rs (request ID, body limit, timeout)
//!     → proxy::ProxyHandler
//!     → JSON outbound envelope
//! ```

pub mod server;

pub use server::{HttpServer, EMULATOR_INVOKE_PATH, HEALTH_PATH, INVOKE_PATH, X_REQUEST_ID};
