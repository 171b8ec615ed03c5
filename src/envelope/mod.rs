//! Wire types at the invocation boundary.
//!
//! # Data Flow
//! ```text
//! hosting runtime
//!     → event.rs (InvocationEvent: envelope text + opaque context)
//!     → [proxy: translate → forward]
//!     → response.rs (ProxyResponse: status, body, flattened headers)
//!     or error_response.rs (ErrorResponse rendered into a ProxyResponse)
//!     → hosting runtime
//! ```
//!
//! # Design Decisions
//! - Everything here is built fresh per invocation and dropped afterwards
//! - Outbound headers are single strings; multi-valued origin headers are joined

pub mod error_response;
pub mod event;
pub mod response;

pub use error_response::{ErrorResponse, BAD_GATEWAY_MESSAGE, BAD_REQUEST_MESSAGE};
pub use event::{InvocationContext, InvocationEvent};
pub use response::ProxyResponse;
