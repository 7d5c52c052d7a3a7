//! Webhook endpoint handlers.
//!
//! Thin axum adapters around [`WebhookIntake`]. All authentication and
//! dispatch logic lives in the intake.

use std::sync::Arc;

use axum::{
    body::{self, Bytes},
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::hooks::EventHooks;
use crate::web::intake::{BoxError, DeliveryRequest, WebhookIntake, ACK_MESSAGE};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub intake: Arc<WebhookIntake>,
}

impl AppState {
    pub fn new(config: Config, hooks: Arc<dyn EventHooks>) -> Self {
        let intake = WebhookIntake::new(config.webhook_secret.clone(), hooks);
        Self {
            config: Arc::new(config),
            intake: Arc::new(intake),
        }
    }
}

/// An axum request with the configured body limit.
pub struct HttpDelivery {
    request: Request,
    body_limit: usize,
}

impl HttpDelivery {
    pub fn new(request: Request, body_limit: usize) -> Self {
        Self {
            request,
            body_limit,
        }
    }
}

impl DeliveryRequest for HttpDelivery {
    fn header(&self, name: &str) -> Option<&str> {
        self.request
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
    }

    async fn read_body(self) -> Result<Bytes, BoxError> {
        body::to_bytes(self.request.into_body(), self.body_limit)
            .await
            .map_err(BoxError::from)
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// GitHub Webhook
// =============================================================================

/// GitHub webhook endpoint.
///
/// Responds with plain text: 200 on success, 401 for a bad signature and
/// 500 when the secret is unset or the body cannot be read.
pub async fn github_webhook(State(state): State<AppState>, request: Request) -> Response {
    let delivery = HttpDelivery::new(request, state.config.max_body_bytes);

    match state.intake.handle(delivery).await {
        Ok(_) => (StatusCode::OK, ACK_MESSAGE).into_response(),
        Err(e) => e.into_response(),
    }
}
