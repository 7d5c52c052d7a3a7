//! Webhook endpoint tests.
//!
//! Drives the full router with `oneshot` requests and checks the exact
//! status/body pairs returned for each intake outcome.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    body::{Body, Bytes},
    http::{Request, StatusCode},
    Router,
};
use pushhook::{create_router, web::compute_signature, AppState, Config, Delivery, EventHooks};
use serde_json::Value;
use tower::ServiceExt;

#[derive(Default)]
struct RecordingHooks {
    pushes: AtomicUsize,
    others: Mutex<Vec<String>>,
}

impl EventHooks for RecordingHooks {
    fn on_push(&self, _delivery: &Delivery) {
        self.pushes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_other(&self, event: &str, _delivery: &Delivery) {
        self.others.lock().unwrap().push(event.to_string());
    }
}

fn app(config: Config) -> (Router, Arc<RecordingHooks>) {
    let hooks = Arc::new(RecordingHooks::default());
    let state = AppState::new(config, hooks.clone());
    (create_router(state), hooks)
}

fn webhook_request(signature: Option<&str>, event: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("X-Hub-Signature", signature);
    }
    if let Some(event) = event {
        builder = builder.header("X-GitHub-Event", event);
    }
    builder.body(body).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.expect("failed to make request");
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, String::from_utf8(body_bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn valid_signature_is_acknowledged() {
    let (app, _) = app(Config::with_secret("mysecret"));
    let signature = compute_signature(b"mysecret", b"hello").unwrap();

    let (status, body) = send(app, webhook_request(Some(&signature), None, Body::from("hello"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Webhook received and processed");
}

#[tokio::test]
async fn unset_secret_rejects_every_request() {
    let (app, hooks) = app(Config::default());
    let signature = compute_signature(b"mysecret", b"hello").unwrap();

    for request in [
        webhook_request(Some(&signature), Some("push"), Body::from("hello")),
        webhook_request(None, None, Body::empty()),
    ] {
        let (status, body) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Webhook secret not set");
    }
    assert_eq!(hooks.pushes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wrong_signature_is_unauthorized() {
    let (app, hooks) = app(Config::with_secret("mysecret"));

    let (status, body) = send(
        app,
        webhook_request(
            Some("sha1=0000000000000000000000000000000000000000"),
            Some("push"),
            Body::from("hello"),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, "Invalid signature");
    assert_eq!(hooks.pushes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_signature_is_indistinguishable_from_wrong_one() {
    let (app, _) = app(Config::with_secret("mysecret"));

    let missing = send(app.clone(), webhook_request(None, Some("push"), Body::from("hello"))).await;
    let malformed = send(
        app.clone(),
        webhook_request(Some("sha256=abc"), Some("push"), Body::from("hello")),
    )
    .await;
    let wrong = send(
        app,
        webhook_request(
            Some("sha1=0000000000000000000000000000000000000000"),
            Some("push"),
            Body::from("hello"),
        ),
    )
    .await;

    assert_eq!(missing, wrong);
    assert_eq!(malformed, wrong);
}

#[tokio::test]
async fn push_event_invokes_push_hook_once() {
    let (app, hooks) = app(Config::with_secret("mysecret"));
    let signature = compute_signature(b"mysecret", b"hello").unwrap();

    let (status, _) = send(
        app,
        webhook_request(Some(&signature), Some("push"), Body::from("hello")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(hooks.pushes.load(Ordering::SeqCst), 1);
    assert!(hooks.others.lock().unwrap().is_empty());
}

#[tokio::test]
async fn other_event_invokes_default_hook_once() {
    let (app, hooks) = app(Config::with_secret("mysecret"));
    let signature = compute_signature(b"mysecret", b"hello").unwrap();

    let (status, body) = send(
        app,
        webhook_request(Some(&signature), Some("pull_request"), Body::from("hello")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Webhook received and processed");
    assert_eq!(hooks.pushes.load(Ordering::SeqCst), 0);
    assert_eq!(*hooks.others.lock().unwrap(), vec!["pull_request".to_string()]);
}

#[tokio::test]
async fn same_request_twice_gets_same_response() {
    let (app, hooks) = app(Config::with_secret("mysecret"));
    let signature = compute_signature(b"mysecret", b"hello").unwrap();

    let first = send(
        app.clone(),
        webhook_request(Some(&signature), Some("push"), Body::from("hello")),
    )
    .await;
    let second = send(
        app,
        webhook_request(Some(&signature), Some("push"), Body::from("hello")),
    )
    .await;

    assert_eq!(first, second);
    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(hooks.pushes.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn oversized_body_fails_to_read() {
    let config = Config {
        max_body_bytes: 4,
        ..Config::with_secret("mysecret")
    };
    let (app, hooks) = app(config);
    let signature = compute_signature(b"mysecret", b"hello").unwrap();

    let (status, body) = send(
        app,
        webhook_request(Some(&signature), Some("push"), Body::from("hello")),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Failed to read request body");
    assert_eq!(hooks.pushes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn broken_body_stream_fails_to_read() {
    let (app, _) = app(Config::with_secret("mysecret"));
    let signature = compute_signature(b"mysecret", b"hello").unwrap();
    let chunks: Vec<Result<Bytes, io::Error>> = vec![
        Ok(Bytes::from_static(b"hel")),
        Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset")),
    ];
    let body = Body::from_stream(futures::stream::iter(chunks));

    let (status, body) = send(app, webhook_request(Some(&signature), Some("push"), body)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Failed to read request body");
}

#[tokio::test]
async fn webhook_rejects_get() {
    let (app, _) = app(Config::with_secret("mysecret"));
    let request = Request::builder()
        .method("GET")
        .uri("/webhook")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn health_check_returns_ok() {
    let (app, _) = app(Config::default());
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_str(&body).expect("health response should be JSON");
    assert_eq!(health["status"], "ok");
}
