//! GitHub webhook signature verification.
//!
//! GitHub signs webhook deliveries using HMAC-SHA1 over the raw request body
//! and sends the result in `X-Hub-Signature` as `sha1=<lowercase hex>`.
//! Reference: https://docs.github.com/en/webhooks/using-webhooks/validating-webhook-deliveries

use hmac::{Hmac, Mac};
use sha1::Sha1;
use subtle::ConstantTimeEq;
use tracing::warn;

type HmacSha1 = Hmac<Sha1>;

/// Header carrying the signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";

/// Prefix of the signature header value.
pub const SIGNATURE_PREFIX: &str = "sha1=";

/// Compute the expected `X-Hub-Signature` value for a payload.
///
/// The MAC covers the exact bytes given, so callers must pass the body as
/// received, not a re-encoded or trimmed form.
pub fn compute_signature(secret: &[u8], payload: &[u8]) -> Option<String> {
    let mut mac = match HmacSha1::new_from_slice(secret) {
        Ok(m) => m,
        Err(_) => {
            warn!("github_signature_invalid_key");
            return None;
        }
    };

    mac.update(payload);

    Some(format!(
        "{}{}",
        SIGNATURE_PREFIX,
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Verify a GitHub webhook signature.
///
/// # Arguments
///
/// * `secret` - The shared webhook secret
/// * `signature` - The `X-Hub-Signature` header value, empty if absent
/// * `payload` - The raw request body
///
/// # Returns
///
/// `true` only if `signature` equals the expected value exactly. A missing,
/// malformed or wrong signature all return `false`.
pub fn verify_github_signature(secret: &[u8], signature: &str, payload: &[u8]) -> bool {
    if secret.is_empty() || signature.is_empty() {
        return false;
    }

    let expected_signature = match compute_signature(secret, payload) {
        Some(s) => s,
        None => return false,
    };

    // Constant-time comparison to prevent timing attacks
    constant_time_compare(&expected_signature, signature)
}

/// Constant-time string comparison. Unequal lengths compare unequal.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
