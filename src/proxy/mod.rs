//! Request forwarding core.
//!
//! # Data Flow
//! ```text
//! envelope text
//!     → translator.rs (JSON object → OutboundRequest, no I/O)
//!     → forwarder.rs (send with deadline, buffer body → ProxyResponse)
//!     → handler.rs (absorbs failures into 400/502 error envelopes)
//! ```
//!
//! # Design Decisions
//! - One request per invocation: no retries, no load balancing
//! - The HTTP client is the only state shared between invocations
//! - Failures are typed (error.rs) until the handler renders them

pub mod error;
pub mod forwarder;
pub mod handler;
pub mod translator;

pub use error::{ProxyError, ProxyResult};
pub use forwarder::Forwarder;
pub use handler::ProxyHandler;
pub use translator::{OutboundBody, OutboundRequest, RequestTarget, RequestTranslator};
