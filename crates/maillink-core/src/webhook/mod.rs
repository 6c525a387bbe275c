//! Inbound webhooks from the aggregation service.
//!
//! Every delivery carries an `x-nylas-signature` header holding the hex
//! HMAC-SHA256 of the raw body, keyed by the client secret.

mod notification;
mod signature;

pub use notification::{
    Delta, ObjectData, WebhookError, WebhookNotification, challenge_response, parse_notification,
};
pub use signature::{SIGNATURE_HEADER, compute_signature, verify_request, verify_signature};
