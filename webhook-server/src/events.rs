//! GitHub event kinds recognized by the intake.

use std::fmt;

/// Header carrying the event name.
pub const EVENT_HEADER: &str = "X-GitHub-Event";

/// Event kind declared by a delivery.
///
/// Anything that is not a recognized kind lands in `Other` with the raw
/// header value, including an empty or missing header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitHubEvent {
    /// New commits were pushed to a branch.
    Push,
    Other(String),
}

impl GitHubEvent {
    /// Parse the `X-GitHub-Event` header value. Matching is exact.
    pub fn from_header(value: &str) -> Self {
        match value {
            "push" => GitHubEvent::Push,
            other => GitHubEvent::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            GitHubEvent::Push => "push",
            GitHubEvent::Other(name) => name,
        }
    }
}

impl fmt::Display for GitHubEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
