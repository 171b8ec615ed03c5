//! Inbound invocation event.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event delivered by the hosting runtime.
///
/// Follows the API-gateway proxy-event shape: the forwarding envelope is the
/// `body` text. Any other fields the runtime sends are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    #[serde(default)]
    pub body: Option<String>,
}

impl InvocationEvent {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
        }
    }
}

/// Opaque per-invocation context. Only used to correlate log lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub request_id: String,
}

impl InvocationContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }
}
