//! Serverless HTTP forwarding shim.
//!
//! Takes a JSON envelope describing an HTTP request, sends it to the origin
//! it names, and returns the origin's answer as a status/body/headers
//! envelope. Failures become 400 or 502 error envelopes.

pub mod config;
pub mod envelope;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;

pub use config::schema::ShimConfig;
pub use envelope::{ErrorResponse, InvocationContext, InvocationEvent, ProxyResponse};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::{ProxyError, ProxyHandler};
