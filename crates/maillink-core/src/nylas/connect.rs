//! Native-auth account linking.
//!
//! Linking is a two-step exchange authenticated by the service client id:
//! `POST /connect/authorize` with the provider refresh token yields a code,
//! and `POST /connect/token` trades the code for the account's access token.

use std::fmt;

use maillink_oauth::ProviderKind;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use super::client::{NylasClient, read_json};
use super::error::NylasError;
use super::outcome::{Outcome, SkipReason};
use crate::provider::ProviderSettings;

/// Scopes requested for linked accounts.
pub const NYLAS_SCOPES: &[&str] = &[
    "email.read_only",
    "email.send",
    "email.modify",
    "calendar",
    "contacts",
];

/// Account to link.
#[derive(Clone)]
pub struct ConnectRequest {
    /// Mail provider.
    pub kind: ProviderKind,
    /// Display name of the account owner.
    pub name: String,
    /// Email address of the account.
    pub email: String,
    /// Provider refresh token obtained by the application.
    pub refresh_token: String,
    /// Service scopes to grant.
    pub scopes: Vec<String>,
}

impl ConnectRequest {
    /// Creates a request with the default scopes.
    #[must_use]
    pub fn new(
        kind: ProviderKind,
        name: impl Into<String>,
        email: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            email: email.into(),
            refresh_token: refresh_token.into(),
            scopes: NYLAS_SCOPES.iter().map(ToString::to_string).collect(),
        }
    }

    /// Replaces the requested scopes.
    #[must_use]
    pub fn with_scopes<S: AsRef<str>>(mut self, scopes: &[S]) -> Self {
        self.scopes = scopes.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }
}

impl fmt::Debug for ConnectRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectRequest")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct AuthorizeBody<'a> {
    client_id: &'a str,
    name: &'a str,
    email_address: &'a str,
    provider: ProviderKind,
    settings: ProviderSettings,
    scopes: String,
}

#[derive(Deserialize)]
struct AuthorizeResponse {
    code: String,
}

/// Account linked to the service.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectedAccount {
    /// Access token for the account's session.
    pub access_token: String,
    /// Account id.
    pub account_id: String,
    /// Email address of the account.
    pub email_address: String,
    /// Provider as reported by the service.
    pub provider: String,
}

impl fmt::Debug for ConnectedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectedAccount")
            .field("account_id", &self.account_id)
            .field("email_address", &self.email_address)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

impl NylasClient {
    /// Links an account with its provider refresh token.
    ///
    /// Skipped when service credentials are not configured; missing
    /// provider configuration or a rejected exchange is `Failed`.
    pub async fn connect_account(&self, request: &ConnectRequest) -> Outcome<ConnectedAccount> {
        let settings = self.settings();
        let (Some(client_id), Some(client_secret)) = (
            settings.nylas_client_id.as_deref(),
            settings.nylas_client_secret.as_deref(),
        ) else {
            warn!("Service credentials are not configured, skipping connect");
            return Outcome::Skipped(SkipReason::MissingCredentials);
        };

        match self.connect(request, client_id, client_secret).await {
            Ok(account) => {
                info!(
                    account_id = %account.account_id,
                    provider = %account.provider,
                    "Connected account"
                );
                Outcome::Done(account)
            }
            Err(err) => {
                warn!(provider = %request.kind, error = %err, "Failed to connect account");
                Outcome::Failed(err)
            }
        }
    }

    async fn connect(
        &self,
        request: &ConnectRequest,
        client_id: &str,
        client_secret: &str,
    ) -> Result<ConnectedAccount, NylasError> {
        let authorize = AuthorizeBody {
            client_id,
            name: &request.name,
            email_address: &request.email,
            provider: request.kind,
            settings: self
                .settings()
                .provider_settings(request.kind, &request.refresh_token)?,
            scopes: request.scopes.join(","),
        };

        let response = self
            .post(&["connect", "authorize"])?
            .json(&authorize)
            .send()
            .await?;
        let AuthorizeResponse { code } = serde_json::from_value(read_json(response).await?)?;

        let response = self
            .post(&["connect", "token"])?
            .json(&json!({
                "client_id": client_id,
                "client_secret": client_secret,
                "code": code,
            }))
            .send()
            .await?;
        Ok(serde_json::from_value(read_json(response).await?)?)
    }
}
