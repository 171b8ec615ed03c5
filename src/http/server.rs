//! Local invocation host.
//!
//! # Responsibilities
//! - Accept invocation events over HTTP and hand them to the `ProxyHandler`
//! - Return the outbound envelope as the invocation result
//! - Wire up middleware (request ID, tracing, body limit, timeout)
//! - Serve until the shutdown coordinator fires
//!
//! # Design Decisions
//! - The envelope's own `statusCode` carries the proxied status; the host
//!   answers 200 for every envelope, like a function runtime does
//! - A missing event is a hard invocation failure (500), never an envelope

use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ListenerConfig;
use crate::envelope::{InvocationContext, InvocationEvent};
use crate::lifecycle::shutdown::stopped;
use crate::proxy::ProxyHandler;

/// Path accepted for invocations.
pub const INVOKE_PATH: &str = "/invoke";

/// Invocation path used by function runtime emulators.
pub const EMULATOR_INVOKE_PATH: &str = "/2015-03-31/functions/function/invocations";

pub const HEALTH_PATH: &str = "/health";

pub const X_REQUEST_ID: &str = "x-request-id";

/// Slack on top of the forwarder timeout before the host gives up itself.
const HOST_TIMEOUT_GRACE: Duration = Duration::from_secs(5);

/// Body returned when an invocation cannot be handled at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationFailure {
    pub error_type: String,
    pub error_message: String,
}

/// State injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub handler: ProxyHandler,
}

/// HTTP host for the forwarding shim.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(handler: ProxyHandler, config: &ListenerConfig) -> Self {
        let router = Self::build_router(handler, config);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(handler: ProxyHandler, config: &ListenerConfig) -> Router {
        let request_timeout = handler.forwarder().timeout() + HOST_TIMEOUT_GRACE;
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route(INVOKE_PATH, post(invoke))
            .route(EMULATOR_INVOKE_PATH, post(invoke))
            .route(HEALTH_PATH, get(health))
            .with_state(AppState { handler })
            .layer(DefaultBodyLimit::disable())
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(request_id))
                    .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
                    .layer(TimeoutLayer::new(request_timeout)),
            )
    }

    /// The fully layered router, for driving the host without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Invocation host starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(stopped(shutdown))
            .await?;

        tracing::info!("Invocation host stopped");
        Ok(())
    }
}

async fn invoke(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(event): Json<Option<InvocationEvent>>,
) -> Response {
    let ctx = match headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok()) {
        Some(id) => InvocationContext::new(id),
        None => InvocationContext::default(),
    };

    match state.handler.handle(event.as_ref(), &ctx).await {
        Ok(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        Err(e) => {
            tracing::error!(request_id = %ctx.request_id, error = %e, "Invocation failed");
            let failure = InvocationFailure {
                error_type: e.kind().to_string(),
                error_message: e.to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(failure)).into_response()
        }
    }
}

async fn health() -> &'static str {
    "ok"
}
