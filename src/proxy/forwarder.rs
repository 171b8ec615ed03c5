//! Origin forwarding.
//!
//! # Responsibilities
//! - Resolve the target and send the translated request to the origin
//! - Bound the whole exchange (headers and full body) by one deadline
//! - Convert the origin response into an outbound envelope
//!
//! # Design Decisions
//! - The `reqwest::Client` is built once and injected; clones share its pool
//! - The deadline is a `tokio::time::timeout` around send + body read.
//!   Expiry drops the in-flight future, which discards its connection
//! - Bodies are fully buffered; nothing is streamed back

use std::time::{Duration, Instant};

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use url::Url;

use crate::config::ForwarderConfig;
use crate::envelope::ProxyResponse;
use crate::observability::metrics;
use crate::proxy::error::{ProxyError, ProxyResult};
use crate::proxy::translator::OutboundRequest;

/// Budget for one origin exchange.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Build the process-wide origin client from configuration.
pub fn build_client(config: &ForwarderConfig) -> Result<Client, reqwest::Error> {
    let mut builder =
        Client::builder().pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs));
    if let Some(agent) = &config.user_agent {
        builder = builder.user_agent(agent.clone());
    }
    builder.build()
}

/// Sends translated requests to the origin.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
    timeout: Duration,
    base_url: Option<Url>,
}

impl Forwarder {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            timeout: DEFAULT_TIMEOUT,
            base_url: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Base used to resolve relative request URIs.
    pub fn with_base_url(mut self, base_url: Option<Url>) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Execute the request and return the origin's response as an envelope.
    pub async fn forward(&self, request: OutboundRequest) -> ProxyResult<ProxyResponse> {
        let url = request.target.resolve(self.base_url.as_ref())?;
        let method = request.method.clone();

        let mut headers = request.headers;
        let mut builder = self.client.request(request.method, url.clone());
        if let Some(body) = request.body {
            headers.insert(CONTENT_TYPE, body.content_type);
            builder = builder.body(body.text);
        }
        let builder = builder.headers(headers);

        tracing::debug!(method = %method, url = %url, "Forwarding to origin");

        let started = Instant::now();
        let exchange = async move {
            let response = builder.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, headers, body))
        };

        let timeout_ms = self.timeout.as_millis() as u64;
        let (status, headers, body) = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(Ok(parts)) => parts,
            Ok(Err(e)) if e.is_timeout() => {
                metrics::record_upstream(None, started);
                return Err(ProxyError::UpstreamTimeout(timeout_ms));
            }
            Ok(Err(e)) => {
                metrics::record_upstream(None, started);
                return Err(ProxyError::unreachable_from(
                    format!("{} {} failed", method, url),
                    e,
                ));
            }
            Err(_) => {
                metrics::record_upstream(None, started);
                return Err(ProxyError::UpstreamTimeout(timeout_ms));
            }
        };

        metrics::record_upstream(Some(status), started);
        tracing::debug!(
            status = %status,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Origin responded"
        );

        Ok(ProxyResponse::from_origin(
            status,
            &headers,
            String::from_utf8_lossy(&body).into_owned(),
        ))
    }
}
