//! Invocation host tests: real listener, reqwest as the runtime stand-in.

use std::net::SocketAddr;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use http_forward_shim::config::ListenerConfig;
use http_forward_shim::http::server::InvocationFailure;
use http_forward_shim::http::{EMULATOR_INVOKE_PATH, HEALTH_PATH, INVOKE_PATH, X_REQUEST_ID};
use http_forward_shim::{HttpServer, InvocationEvent, ProxyResponse, Shutdown};

mod common;

struct Host {
    addr: SocketAddr,
    shutdown: Shutdown,
    task: JoinHandle<Result<(), std::io::Error>>,
}

async fn start_host() -> Host {
    let handler = common::handler_with_timeout(5_000);
    let server = HttpServer::new(handler, &ListenerConfig::default());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let task = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    Host {
        addr,
        shutdown,
        task,
    }
}

fn url(host: &Host, path: &str) -> String {
    format!("http://{}{}", host.addr, path)
}

#[tokio::test]
async fn test_invoke_returns_origin_envelope() {
    let origin = common::start_echo_origin().await;
    let host = start_host().await;

    let envelope = json!({
        "method": "GET",
        "requestUri": format!("http://{}/ping", origin),
        "X-Probe": "1",
    });
    let res = common::origin_client()
        .post(url(&host, INVOKE_PATH))
        .json(&InvocationEvent::new(envelope.to_string()))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let envelope: ProxyResponse = res.json().await.unwrap();
    assert_eq!(envelope.status_code, 200);
    let echoed: Value = serde_json::from_str(&envelope.body).unwrap();
    assert_eq!(echoed["uri"], "/ping");
    assert_eq!(echoed["headers"]["x-probe"], json!(["1"]));

    host.shutdown.trigger();
}

#[tokio::test]
async fn test_emulator_path_and_request_id() {
    let host = start_host().await;

    let res = common::origin_client()
        .post(url(&host, EMULATOR_INVOKE_PATH))
        .header(X_REQUEST_ID, "req-42")
        .json(&InvocationEvent::new("{not json"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()[X_REQUEST_ID], "req-42");
    let envelope: ProxyResponse = res.json().await.unwrap();
    assert_eq!(envelope.status_code, 400);
    assert_eq!(envelope.headers["Content-Type"], "application/json");

    host.shutdown.trigger();
}

#[tokio::test]
async fn test_null_event_is_invocation_failure() {
    let host = start_host().await;

    let res = common::origin_client()
        .post(url(&host, INVOKE_PATH))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("null")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let failure: InvocationFailure = res.json().await.unwrap();
    assert_eq!(failure.error_type, "InvalidArgument");

    host.shutdown.trigger();
}

#[tokio::test]
async fn test_health_and_graceful_shutdown() {
    let host = start_host().await;

    let res = common::origin_client()
        .get(url(&host, HEALTH_PATH))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "ok");

    host.shutdown.trigger();
    let result = tokio::time::timeout(Duration::from_secs(5), host.task)
        .await
        .expect("host should stop after shutdown")
        .unwrap();
    assert!(result.is_ok());
}
