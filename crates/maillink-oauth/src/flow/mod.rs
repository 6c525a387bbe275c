//! Provider `OAuth2` client.

mod code;

use reqwest::Client;
use tracing::debug;

use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::token::{ErrorResponse, Token, TokenResponse};

/// Client registered with a mail provider's `OAuth2` server.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    /// Client ID from the provider.
    pub client_id: String,
    /// Client secret.
    pub client_secret: Option<String>,
    /// Redirect URI registered with the provider.
    pub redirect_uri: Option<String>,
    /// Provider configuration.
    pub provider: Provider,
    http_client: Client,
}

impl OAuthClient {
    /// Creates a new OAuth client.
    #[must_use]
    pub fn new(client_id: impl Into<String>, provider: Provider) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: None,
            provider,
            http_client: Client::new(),
        }
    }

    /// Sets the client secret.
    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Sets the redirect URI.
    #[must_use]
    pub fn with_redirect_uri(mut self, uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(uri.into());
        self
    }

    /// Uses a caller-supplied HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    /// Exchanges an authorization code for tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the provider rejects the code.
    pub async fn exchange_code(&self, code: &str) -> Result<Token> {
        if code.is_empty() {
            return Err(Error::InvalidConfig("authorization code is empty".into()));
        }

        let mut params = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", self.client_id.as_str()),
        ];
        if let Some(uri) = &self.redirect_uri {
            params.push(("redirect_uri", uri.as_str()));
        }
        if let Some(secret) = &self.client_secret {
            params.push(("client_secret", secret.as_str()));
        }

        let token = self.request_token(&params).await?;
        debug!(provider = %self.provider.kind, "exchanged authorization code");
        Ok(token)
    }

    /// Refreshes an access token, keeping the old refresh token if the
    /// provider does not rotate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the token has no refresh token or the refresh fails.
    pub async fn refresh(&self, token: &Token) -> Result<Token> {
        let refresh_token = token.refresh_token()?;

        let mut params = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.client_id.as_str()),
        ];
        if let Some(secret) = &self.client_secret {
            params.push(("client_secret", secret.as_str()));
        }

        let mut refreshed = self.request_token(&params).await?;
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token.clone_from(&token.refresh_token);
        }

        debug!(provider = %self.provider.kind, "refreshed access token");
        Ok(refreshed)
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> Result<Token> {
        let mut request = self.http_client.post(self.provider.token_url.clone());
        for (name, value) in &self.provider.header_params {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.form(params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(serde_json::from_str::<ErrorResponse>(&body).map_or_else(
                |_| Error::InvalidResponse(format!("token endpoint returned {status}")),
                ErrorResponse::into_error,
            ));
        }

        let token_response: TokenResponse = serde_json::from_str(&body)?;
        Token::from_response(token_response)
    }
}
