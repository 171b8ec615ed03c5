//! Error envelope construction.
//!
//! # Responsibilities
//! - Carry a status code, a user-facing message and a developer detail
//! - Render itself as a JSON outbound envelope
//!
//! # Design Decisions
//! - The developer message falls back to the user message through an
//!   accessor; nothing aliases the stored fields
//! - Error envelopes always declare `Content-Type: application/json`

use reqwest::StatusCode;
use serde_json::{Map, Value};

use crate::envelope::response::ProxyResponse;
use crate::proxy::error::ProxyError;

pub const BAD_REQUEST_MESSAGE: &str = "Body is not valid JSON or does not match the expected schema.";
pub const BAD_GATEWAY_MESSAGE: &str = "An error occurred performing the proxy";

const CONTENT_TYPE_HEADER: &str = "Content-Type";
const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    status: StatusCode,
    message: Option<String>,
    developer_message: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: None,
            developer_message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_developer_message(mut self, detail: impl Into<String>) -> Self {
        self.developer_message = Some(detail.into());
        self
    }

    /// Envelope for a translation or forwarding failure.
    ///
    /// Returns `None` for errors that must not be absorbed into an envelope.
    pub fn for_error(err: &ProxyError) -> Option<Self> {
        let status = err.status()?;
        let message = if status == StatusCode::BAD_REQUEST {
            BAD_REQUEST_MESSAGE
        } else {
            BAD_GATEWAY_MESSAGE
        };
        Some(
            Self::new(status)
                .with_message(message)
                .with_developer_message(err.detail()),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The developer detail if one was set, otherwise the user message.
    pub fn developer_message(&self) -> Option<&str> {
        self.developer_message.as_deref().or(self.message())
    }

    /// JSON body; unset fields are omitted.
    pub fn to_json(&self) -> Value {
        let mut body = Map::new();
        body.insert("statusCode".into(), Value::from(self.status.as_u16()));
        if let Some(message) = self.message() {
            body.insert("message".into(), Value::from(message));
        }
        if let Some(detail) = self.developer_message() {
            body.insert("developerMessage".into(), Value::from(detail));
        }
        Value::Object(body)
    }

    pub fn into_response(self) -> ProxyResponse {
        ProxyResponse::new(self.status, self.to_json().to_string())
            .with_header(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_developer_message_falls_back_to_message() {
        let err = ErrorResponse::new(StatusCode::BAD_REQUEST).with_message("bad");
        assert_eq!(err.developer_message(), Some("bad"));

        let json = err.to_json();
        assert_eq!(json["message"], "bad");
        assert_eq!(json["developerMessage"], "bad");
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let json = ErrorResponse::new(StatusCode::BAD_GATEWAY).to_json();
        assert_eq!(json, serde_json::json!({ "statusCode": 502 }));
    }

    #[test]
    fn test_explicit_developer_message_wins() {
        let err = ErrorResponse::new(StatusCode::BAD_GATEWAY)
            .with_message("failed")
            .with_developer_message("connection refused");
        assert_eq!(err.developer_message(), Some("connection refused"));
    }

    #[test]
    fn test_for_error_maps_taxonomy() {
        let bad_request = ErrorResponse::for_error(&ProxyError::malformed("not an object")).unwrap();
        assert_eq!(bad_request.status(), StatusCode::BAD_REQUEST);
        assert_eq!(bad_request.message(), Some(BAD_REQUEST_MESSAGE));
        assert!(bad_request.developer_message().unwrap().contains("not an object"));

        let timeout = ErrorResponse::for_error(&ProxyError::UpstreamTimeout(10_000)).unwrap();
        assert_eq!(timeout.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(timeout.message(), Some(BAD_GATEWAY_MESSAGE));

        assert!(ErrorResponse::for_error(&ProxyError::InvalidArgument("request")).is_none());
    }

    #[test]
    fn test_into_response_is_json() {
        let response = ErrorResponse::new(StatusCode::BAD_GATEWAY)
            .with_message(BAD_GATEWAY_MESSAGE)
            .into_response();

        assert_eq!(response.status_code, 502);
        assert_eq!(response.headers["Content-Type"], "application/json");
        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["message"], BAD_GATEWAY_MESSAGE);
    }
}
