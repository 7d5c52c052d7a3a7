//! Configuration module for environment variable parsing.
//!
//! Configuration is read once at startup and injected into the web layer.
//! Nothing reads the process environment per request.

use std::env;
use std::fmt;
use std::str::FromStr;

use tracing::warn;

/// GitHub caps webhook payloads at 25 MiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

/// Shared secret used to sign webhook deliveries.
///
/// An unset or empty secret is a valid runtime state: every delivery is
/// rejected until an operator configures one.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct WebhookSecret(Option<Vec<u8>>);

impl WebhookSecret {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        let bytes = value.into();
        if bytes.is_empty() {
            Self(None)
        } else {
            Self(Some(bytes))
        }
    }

    pub fn unset() -> Self {
        Self(None)
    }

    pub fn from_env_value(value: Option<String>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }

    /// Secret bytes, or `None` when the secret is not configured.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.0.as_deref()
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("WebhookSecret([redacted])"),
            None => f.write_str("WebhookSecret(unset)"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Shared secret for HMAC-SHA1 signature verification
    pub webhook_secret: WebhookSecret,

    /// Largest request body the intake will read
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            webhook_secret: WebhookSecret::unset(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            port: parse_or("PORT", defaults.port),

            webhook_secret: WebhookSecret::from_env_value(env::var("WEBHOOK_SECRET").ok()),

            max_body_bytes: parse_or("MAX_BODY_BYTES", defaults.max_body_bytes),
        }
    }

    /// Configuration with the given secret and defaults elsewhere.
    pub fn with_secret(secret: impl Into<Vec<u8>>) -> Self {
        Config {
            webhook_secret: WebhookSecret::new(secret),
            ..Config::default()
        }
    }
}

/// Parse a numeric variable, falling back to `default` when absent or invalid.
fn parse_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
{
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}
