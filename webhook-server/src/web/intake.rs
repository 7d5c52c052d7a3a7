//! Authenticated webhook intake.
//!
//! [`WebhookIntake::handle`] is independent of the HTTP framework. It only
//! needs a [`DeliveryRequest`] that can look up headers and read the body
//! once. The axum adapter lives in [`crate::web::handlers`].
//!
//! Each step can short-circuit the rest:
//! 1. Resolve the secret (unset fails closed, the body is never read)
//! 2. Read the raw body
//! 3. Verify `X-Hub-Signature` against HMAC-SHA1 of the body
//! 4. Dispatch on `X-GitHub-Event` to the hooks

use std::future::Future;
use std::sync::Arc;

use axum::{
    body::Bytes,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::config::WebhookSecret;
use crate::events::{GitHubEvent, EVENT_HEADER};
use crate::hooks::{Delivery, EventHooks, DELIVERY_HEADER};
use crate::web::signature::{verify_github_signature, SIGNATURE_HEADER};

/// Body returned for every accepted delivery.
pub const ACK_MESSAGE: &str = "Webhook received and processed";

/// Boxed error from the underlying transport.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Ways a delivery can be rejected.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("webhook secret is not configured")]
    SecretNotSet,

    #[error("failed to read request body")]
    BodyUnreadable(#[source] BoxError),

    /// Covers absent, malformed and wrong signatures alike.
    #[error("signature verification failed")]
    InvalidSignature,
}

impl IntakeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IntakeError::SecretNotSet | IntakeError::BodyUnreadable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            IntakeError::InvalidSignature => StatusCode::UNAUTHORIZED,
        }
    }

    /// Text sent to the client. Never includes digests or secret state
    /// beyond what the status already implies.
    pub fn public_message(&self) -> &'static str {
        match self {
            IntakeError::SecretNotSet => "Webhook secret not set",
            IntakeError::BodyUnreadable(_) => "Failed to read request body",
            IntakeError::InvalidSignature => "Invalid signature",
        }
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        (self.status_code(), self.public_message()).into_response()
    }
}

/// What the intake needs from an inbound HTTP request.
pub trait DeliveryRequest: Send + Sized {
    /// Header value by case-insensitive name. Non-UTF-8 values count as absent.
    fn header(&self, name: &str) -> Option<&str>;

    /// Consume the request and read the whole body.
    fn read_body(self) -> impl Future<Output = Result<Bytes, BoxError>> + Send;
}

/// Verifies deliveries against an injected secret and dispatches them.
#[derive(Clone)]
pub struct WebhookIntake {
    secret: WebhookSecret,
    hooks: Arc<dyn EventHooks>,
}

impl WebhookIntake {
    pub fn new(secret: WebhookSecret, hooks: Arc<dyn EventHooks>) -> Self {
        Self { secret, hooks }
    }

    pub fn secret_configured(&self) -> bool {
        self.secret.is_set()
    }

    /// Authenticate one delivery and run the matching hook.
    ///
    /// Returns the dispatched event kind on success.
    pub async fn handle<R: DeliveryRequest>(&self, request: R) -> Result<GitHubEvent, IntakeError> {
        let secret = match self.secret.as_bytes() {
            Some(s) => s,
            None => {
                error!("webhook_secret_not_set");
                return Err(IntakeError::SecretNotSet);
            }
        };

        let signature = request.header(SIGNATURE_HEADER).unwrap_or_default().to_owned();
        let event = GitHubEvent::from_header(request.header(EVENT_HEADER).unwrap_or_default());
        let delivery_id = request.header(DELIVERY_HEADER).map(str::to_owned);

        let payload = match request.read_body().await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, delivery_id = ?delivery_id, "webhook_body_read_failed");
                return Err(IntakeError::BodyUnreadable(e));
            }
        };

        if !verify_github_signature(secret, &signature, &payload) {
            warn!(
                delivery_id = ?delivery_id,
                has_signature = !signature.is_empty(),
                payload_length = payload.len(),
                "github_signature_invalid"
            );
            return Err(IntakeError::InvalidSignature);
        }

        let delivery = Delivery {
            id: delivery_id,
            payload,
        };

        match &event {
            GitHubEvent::Push => self.hooks.on_push(&delivery),
            GitHubEvent::Other(name) => self.hooks.on_other(name, &delivery),
        }

        Ok(event)
    }
}
