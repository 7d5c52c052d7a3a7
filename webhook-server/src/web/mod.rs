//! Web server module for handling inbound GitHub webhooks.
//!
//! This module provides a thin web server that:
//! - Receives webhook deliveries on `POST /webhook`
//! - Verifies the HMAC-SHA1 signature against the shared secret
//! - Hands authenticated deliveries to the configured hooks
//! - Answers with a fixed plain-text acknowledgment

pub mod handlers;
pub mod intake;
pub mod signature;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{github_webhook, health, AppState, HealthResponse, HttpDelivery};
pub use intake::{DeliveryRequest, IntakeError, WebhookIntake, ACK_MESSAGE};
pub use signature::{compute_signature, verify_github_signature};

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(github_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
