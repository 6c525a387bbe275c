//! Webhook delta payloads.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::signature::verify_signature;

/// Errors from accepting a webhook delivery.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// Request carried no signature header.
    #[error("Missing x-nylas-signature header")]
    MissingSignature,

    /// Signature does not match the body.
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// Body is not a notification.
    #[error("Invalid webhook payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// One webhook delivery.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebhookNotification {
    /// Changes carried by this delivery.
    #[serde(default)]
    pub deltas: Vec<Delta>,
}

/// A single change notification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Delta {
    /// Unix timestamp of the change.
    #[serde(default)]
    pub date: Option<i64>,
    /// Object kind, e.g. `message` or `thread`.
    pub object: String,
    /// Trigger, e.g. `message.created`.
    #[serde(rename = "type")]
    pub trigger: String,
    /// The changed object.
    #[serde(default)]
    pub object_data: Option<ObjectData>,
}

/// Reference to the object a delta describes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ObjectData {
    /// Object id.
    #[serde(default)]
    pub id: Option<String>,
    /// Account the object belongs to.
    #[serde(default)]
    pub account_id: Option<String>,
    /// Namespace id, equal to the account id.
    #[serde(default)]
    pub namespace_id: Option<String>,
    /// Object kind.
    #[serde(default)]
    pub object: Option<String>,
    /// Extra attributes, present for some triggers.
    #[serde(default)]
    pub attributes: Option<Value>,
}

impl Delta {
    /// Account the change belongs to, if the payload names one.
    #[must_use]
    pub fn account_id(&self) -> Option<&str> {
        self.object_data.as_ref()?.account_id.as_deref()
    }
}

/// Verifies a delivery and parses its payload.
///
/// # Errors
///
/// Returns [`WebhookError::MissingSignature`] or
/// [`WebhookError::InvalidSignature`] before looking at the body, and
/// [`WebhookError::Json`] if a correctly signed body is not a notification.
pub fn parse_notification(
    secret: &str,
    body: &[u8],
    signature: Option<&str>,
) -> Result<WebhookNotification, WebhookError> {
    let signature = signature.ok_or(WebhookError::MissingSignature)?;
    if !verify_signature(secret, body, signature) {
        warn!("Rejected webhook with invalid signature");
        return Err(WebhookError::InvalidSignature);
    }

    let notification: WebhookNotification = serde_json::from_slice(body)?;
    debug!(deltas = notification.deltas.len(), "Accepted webhook");
    Ok(notification)
}

/// Body to echo for the endpoint-verification `GET`.
///
/// `query` is the raw query string; the service sends `?challenge=<value>`
/// and expects the value back verbatim.
#[must_use]
pub fn challenge_response(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(key, _)| key == "challenge")
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::webhook::compute_signature;

    const SECRET: &str = "webhook-secret";

    const PAYLOAD: &str = r#"{
        "deltas": [
            {
                "date": 1602623196,
                "object": "message",
                "type": "message.created",
                "object_data": {
                    "namespace_id": "aaz875kwuvxik6ku7pwkqp3ah",
                    "account_id": "aaz875kwuvxik6ku7pwkqp3ah",
                    "object": "message",
                    "attributes": { "thread_id": "2u152dt4tnq9j61j8seg26ni6", "received_date": 1602623166 },
                    "id": "93mgpjynqqu5fohl2dvv6ray7",
                    "metadata": null
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_signed_notification() {
        let signature = compute_signature(SECRET, PAYLOAD.as_bytes());
        let notification =
            parse_notification(SECRET, PAYLOAD.as_bytes(), Some(signature.as_str())).unwrap();

        assert_eq!(notification.deltas.len(), 1);
        let delta = &notification.deltas[0];
        assert_eq!(delta.trigger, "message.created");
        assert_eq!(delta.object, "message");
        assert_eq!(delta.date, Some(1_602_623_196));
        assert_eq!(delta.account_id(), Some("aaz875kwuvxik6ku7pwkqp3ah"));
        assert_eq!(
            delta.object_data.as_ref().unwrap().id.as_deref(),
            Some("93mgpjynqqu5fohl2dvv6ray7")
        );
    }

    #[test]
    fn test_signature_checked_before_parsing() {
        let zeros = "0".repeat(64);
        let err = parse_notification(SECRET, b"not json", Some(zeros.as_str())).unwrap_err();
        assert!(matches!(err, WebhookError::InvalidSignature));

        let err = parse_notification(SECRET, PAYLOAD.as_bytes(), None).unwrap_err();
        assert!(matches!(err, WebhookError::MissingSignature));
    }

    #[test]
    fn test_signed_garbage_is_json_error() {
        let signature = compute_signature(SECRET, b"not json");
        let err = parse_notification(SECRET, b"not json", Some(signature.as_str())).unwrap_err();
        assert!(matches!(err, WebhookError::Json(_)));
    }

    #[test]
    fn test_challenge_response() {
        assert_eq!(
            challenge_response("?challenge=bc609b38-c81f-47fb-a275-1d9bd61a968b").as_deref(),
            Some("bc609b38-c81f-47fb-a275-1d9bd61a968b")
        );
        assert_eq!(
            challenge_response("foo=1&challenge=a%20b").as_deref(),
            Some("a b")
        );
        assert!(challenge_response("foo=1").is_none());
    }
}
