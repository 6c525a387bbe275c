//! Aggregation service errors.

use super::operation::{Operation, Resource};
use crate::config::ConfigError;

/// Errors from calls to the aggregation service.
#[derive(Debug, thiserror::Error)]
pub enum NylasError {
    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error type reported by the service, e.g. `invalid_request_error`.
        kind: Option<String>,
        /// Error message reported by the service.
        message: String,
    },

    /// Response body did not have the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `parent.child` selector names no known operation.
    #[error("Unknown operation: {parent}.{child}")]
    UnknownOperation {
        /// Resource name as given.
        parent: String,
        /// Action name as given.
        child: String,
    },

    /// Resource does not support the action.
    #[error("Unsupported operation: {0}")]
    Unsupported(Operation),

    /// Action needs an object id but the filter has none.
    #[error("{0} requires an object id")]
    MissingId(Resource),

    /// Action needs a filter parameter that was not given.
    #[error("Missing parameter: {0}")]
    MissingParam(&'static str),

    /// Filter parameter has an unusable value.
    #[error("Invalid parameter {name}: {value}")]
    InvalidParam {
        /// Parameter name.
        name: &'static str,
        /// Value as given.
        value: String,
    },

    /// Draft has no to, cc or bcc recipient.
    #[error("Message has no recipients")]
    NoRecipients,

    /// Configuration needed for the call is missing.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Configured API URL cannot take path segments.
    #[error("API URL cannot be a base")]
    InvalidBaseUrl,
}

impl NylasError {
    /// Whether the service rejected the access token.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}
