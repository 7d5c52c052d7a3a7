//! Follow-on actions invoked after a delivery is authenticated.
//!
//! The intake does not deploy, build or test anything itself. Whatever
//! should happen on a push is plugged in through [`EventHooks`].

use axum::body::Bytes;
use tracing::info;

/// Header carrying GitHub's unique delivery id.
pub const DELIVERY_HEADER: &str = "X-GitHub-Delivery";

/// An authenticated delivery handed to the hooks.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// Value of `X-GitHub-Delivery`, if the sender supplied one
    pub id: Option<String>,
    /// Raw request body, exactly as signed
    pub payload: Bytes,
}

/// Collaborator invoked once per authenticated delivery.
///
/// Exactly one of the two methods is called for each delivery.
pub trait EventHooks: Send + Sync {
    fn on_push(&self, delivery: &Delivery);

    /// Called for every event kind other than `push`, with the raw event name.
    fn on_other(&self, event: &str, delivery: &Delivery);
}

/// Default hooks: log the event and do nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHooks;

impl EventHooks for LoggingHooks {
    fn on_push(&self, delivery: &Delivery) {
        info!(
            delivery_id = ?delivery.id,
            payload_length = delivery.payload.len(),
            "push_event_received"
        );
    }

    fn on_other(&self, event: &str, delivery: &Delivery) {
        info!(
            event = %event,
            delivery_id = ?delivery.id,
            payload_length = delivery.payload.len(),
            "github_event_received"
        );
    }
}
