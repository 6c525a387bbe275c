//! Error types for the core library.

use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration value missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Password encryption or decryption failed.
    #[error("Crypto error: {0}")]
    Crypto(#[from] crate::crypto::CryptoError),

    /// Aggregation service call failed.
    #[error("Nylas error: {0}")]
    Nylas(#[from] crate::nylas::NylasError),

    /// Inbound webhook rejected.
    #[error("Webhook error: {0}")]
    Webhook(#[from] crate::webhook::WebhookError),

    /// Provider `OAuth2` operation failed.
    #[error("OAuth error: {0}")]
    OAuth(#[from] maillink_oauth::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
