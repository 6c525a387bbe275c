//! # maillink-core
//!
//! Integration layer between an application and an email aggregation
//! service (Nylas) that links Gmail and Office365 accounts.
//!
//! This crate provides:
//! - **Configuration** - environment-derived [`Settings`], built once and passed around
//! - **Provider settings** - client credentials and the per-provider parameter shapes
//! - **Sessions** - credential check and access-token sessions against the service
//! - **Request forwarding** - typed `resource.action` dispatch with soft-failure [`Outcome`]s
//! - **Sending** - draft building and sending
//! - **Account linking** - native-auth connect with a provider refresh token
//! - **Webhooks** - `x-nylas-signature` verification and delta payloads
//! - **Password sealing** - AES-256-CBC `ivHex:cipherHex` encryption
//! - **Address lists** - comma-separated recipients to structured addresses

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod address;
pub mod config;
pub mod crypto;
mod error;
pub mod nylas;
pub mod provider;
pub mod webhook;

pub use address::{EmailAddress, build_email_addresses};
pub use config::{ConfigError, OAuthApp, Settings};
pub use crypto::{CryptoError, PasswordCipher, decrypt_password, encrypt_password};
pub use error::{Error, Result};
pub use nylas::{
    Action, ConnectRequest, ConnectedAccount, Draft, Filter, NYLAS_SCOPES, NylasClient, NylasError,
    Operation, Outcome, Resource, SentMessage, Session, SkipReason, check_credentials,
    forward_request, send_message,
};
pub use provider::{ClientConfig, ProviderSettings, provider_configs};
pub use webhook::{
    Delta, SIGNATURE_HEADER, WebhookError, WebhookNotification, challenge_response,
    compute_signature, parse_notification, verify_request, verify_signature,
};

pub use maillink_oauth::{OAuthClient, Provider, ProviderKind, Token};
