//! Webhook signature validation.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

use crate::config::Settings;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "x-nylas-signature";

/// Hex length of an HMAC-SHA256 digest.
const DIGEST_HEX_LEN: usize = 64;

type HmacSha256 = Hmac<Sha256>;

#[allow(clippy::expect_used)]
fn keyed(secret: &str) -> HmacSha256 {
    HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length")
}

/// Lowercase hex HMAC-SHA256 of `body` under `secret`.
#[must_use]
pub fn compute_signature(secret: &str, body: &[u8]) -> String {
    let mut mac = keyed(secret);
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Checks `signature` against the HMAC-SHA256 of the raw `body`.
///
/// The signature must be the exact lowercase hex digest. The digest
/// comparison is constant-time.
#[must_use]
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let well_formed = signature.len() == DIGEST_HEX_LEN
        && signature
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
    if !well_formed {
        return false;
    }

    let Ok(claimed) = hex::decode(signature) else {
        return false;
    };

    let mut mac = keyed(secret);
    mac.update(body);
    mac.verify_slice(&claimed).is_ok()
}

/// Verifies an inbound request with the configured client secret.
///
/// Returns `false` when the secret is not configured or the header is absent.
#[must_use]
pub fn verify_request(settings: &Settings, body: &[u8], signature: Option<&str>) -> bool {
    let Some(secret) = settings.nylas_client_secret.as_deref() else {
        warn!("Cannot verify webhook: client secret is not configured");
        return false;
    };
    let Some(signature) = signature else {
        warn!("Webhook request has no {SIGNATURE_HEADER} header");
        return false;
    };

    verify_signature(secret, body, signature)
}
