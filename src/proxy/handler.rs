//! Invocation entry point.
//!
//! # Flow
//! ```text
//! Translating ──ok──▶ Forwarding ──ok──▶ Done (origin envelope)
//!      │                   │
//!      └─err─▶ 400         └─err─▶ 502
//! ```
//!
//! A missing event is an invocation protocol violation and is returned as
//! `Err(InvalidArgument)`; every other failure becomes an error envelope.

use reqwest::header::HeaderValue;
use reqwest::Client;
use std::time::Duration;

use crate::config::loader::ConfigError;
use crate::config::ForwarderConfig;
use crate::envelope::{ErrorResponse, InvocationContext, InvocationEvent, ProxyResponse};
use crate::observability::metrics::{self, Outcome};
use crate::proxy::error::{ProxyError, ProxyResult};
use crate::proxy::forwarder::Forwarder;
use crate::proxy::translator::RequestTranslator;

/// Translates and forwards one invocation.
///
/// Cheap to clone; clones share the forwarder's HTTP client.
#[derive(Debug, Clone)]
pub struct ProxyHandler {
    translator: RequestTranslator,
    forwarder: Forwarder,
}

impl ProxyHandler {
    pub fn new(translator: RequestTranslator, forwarder: Forwarder) -> Self {
        Self {
            translator,
            forwarder,
        }
    }

    /// Wire the handler from forwarder settings and the shared client.
    pub fn from_config(config: &ForwarderConfig, client: Client) -> Result<Self, ConfigError> {
        let content_type = HeaderValue::from_str(&config.default_content_type)
            .map_err(|e| ConfigError::Invalid(format!("default_content_type: {}", e)))?;
        let base_url = config
            .base_url()
            .map_err(|e| ConfigError::Invalid(format!("base_url: {}", e)))?;

        let forwarder = Forwarder::new(client)
            .with_timeout(Duration::from_millis(config.timeout_ms))
            .with_base_url(base_url);

        Ok(Self::new(RequestTranslator::new(content_type), forwarder))
    }

    pub fn translator(&self) -> &RequestTranslator {
        &self.translator
    }

    pub fn forwarder(&self) -> &Forwarder {
        &self.forwarder
    }

    /// Handle one invocation.
    ///
    /// `Ok` always carries an envelope for the runtime, including 400/502
    /// error envelopes. `Err` is only returned when `event` is absent.
    #[tracing::instrument(name = "invocation", skip_all, fields(request_id = %ctx.request_id))]
    pub async fn handle(
        &self,
        event: Option<&InvocationEvent>,
        ctx: &InvocationContext,
    ) -> ProxyResult<ProxyResponse> {
        let event = event.ok_or(ProxyError::InvalidArgument("invocation event is required"))?;

        let translated = event
            .body
            .as_deref()
            .ok_or_else(|| ProxyError::malformed("invocation event has no body"))
            .and_then(|body| self.translator.translate(body));

        let request = match translated {
            Ok(request) => request,
            Err(e) => return reject(e, Outcome::BadRequest),
        };

        tracing::debug!(
            method = %request.method,
            target = %request.target,
            headers = request.headers.len(),
            has_body = request.body.is_some(),
            "Envelope translated"
        );

        match self.forwarder.forward(request).await {
            Ok(response) => {
                metrics::record_invocation(Outcome::Forwarded);
                tracing::info!(status = response.status_code, "Request forwarded");
                Ok(response)
            }
            Err(e) => reject(e, Outcome::BadGateway),
        }
    }
}

/// Absorb an error into its envelope, or pass it through if it has none.
fn reject(err: ProxyError, outcome: Outcome) -> ProxyResult<ProxyResponse> {
    match ErrorResponse::for_error(&err) {
        Some(envelope) => {
            metrics::record_invocation(outcome);
            tracing::warn!(
                status = envelope.status().as_u16(),
                kind = err.kind(),
                error = %err,
                "Returning error envelope"
            );
            Ok(envelope.into_response())
        }
        None => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::{BAD_GATEWAY_MESSAGE, BAD_REQUEST_MESSAGE};

    fn handler() -> ProxyHandler {
        ProxyHandler::from_config(&ForwarderConfig::default(), Client::new()).unwrap()
    }

    fn error_body(response: &ProxyResponse) -> serde_json::Value {
        serde_json::from_str(&response.body).unwrap()
    }

    #[tokio::test]
    async fn test_missing_event_is_invalid_argument() {
        let err = handler()
            .handle(None, &InvocationContext::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let event = InvocationEvent::new("{not json");
        let response = handler()
            .handle(Some(&event), &InvocationContext::default())
            .await
            .unwrap();

        assert_eq!(response.status_code, 400);
        assert_eq!(response.headers["Content-Type"], "application/json");
        let body = error_body(&response);
        assert_eq!(body["message"], BAD_REQUEST_MESSAGE);
        assert!(!body["developerMessage"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_body_is_bad_request() {
        let response = handler()
            .handle(Some(&InvocationEvent::default()), &InvocationContext::default())
            .await
            .unwrap();
        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn test_unresolvable_target_is_bad_gateway() {
        let event = InvocationEvent::new(r#"{"method":"GET","requestUri":"relative/path"}"#);
        let response = handler()
            .handle(Some(&event), &InvocationContext::default())
            .await
            .unwrap();

        assert_eq!(response.status_code, 502);
        let body = error_body(&response);
        assert_eq!(body["message"], BAD_GATEWAY_MESSAGE);
        assert!(body["developerMessage"]
            .as_str()
            .unwrap()
            .contains("no base address configured"));
    }

    #[test]
    fn test_from_config_rejects_bad_content_type() {
        let config = ForwarderConfig {
            default_content_type: "text/plain\n".into(),
            ..ForwarderConfig::default()
        };
        assert!(ProxyHandler::from_config(&config, Client::new()).is_err());
    }
}
