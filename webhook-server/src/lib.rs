//! Pushhook - authenticated GitHub push webhook receiver.
//!
//! The `pushhook` binary serves a single intake endpoint. Deliveries are
//! authenticated with HMAC-SHA1 over the raw body and dispatched to
//! [`EventHooks`] by event kind.
//!
//! ## Request flow
//!
//! ```text
//! GitHub → POST /webhook → secret check → body → signature → hooks → 200
//! ```

pub mod config;
pub mod events;
pub mod hooks;
pub mod web;

// Re-export commonly used types
pub use config::{Config, WebhookSecret};
pub use events::GitHubEvent;
pub use hooks::{Delivery, EventHooks, LoggingHooks};
pub use web::{create_router, AppState, IntakeError, WebhookIntake};
