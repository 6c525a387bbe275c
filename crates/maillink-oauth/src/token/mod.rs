//! Tokens issued by a provider's token endpoint.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Seconds before the real expiry at which a token is treated as expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Provider `OAuth2` token.
///
/// The refresh token is what the aggregation service needs to link an
/// account; the access token is only short-lived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    /// Access token string.
    pub access_token: String,
    /// Token type (usually "Bearer").
    pub token_type: String,
    /// Expiration time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Refresh token for obtaining new access tokens.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Scope granted by the authorization server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// `OpenID` Connect identity token, when `openid` was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl Token {
    /// Creates a bearer token with no expiry or refresh token.
    #[must_use]
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            expires_at: None,
            refresh_token: None,
            scope: None,
            id_token: None,
        }
    }

    /// Builds a token from a token endpoint response.
    ///
    /// # Errors
    ///
    /// Returns an error if the response carries an empty access token.
    pub fn from_response(response: TokenResponse) -> Result<Self> {
        if response.access_token.is_empty() {
            return Err(Error::InvalidResponse("empty access_token".into()));
        }

        let expires_at = response
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(i64::from(secs)));

        Ok(Self {
            access_token: response.access_token,
            token_type: response.token_type,
            expires_at,
            refresh_token: response.refresh_token.filter(|t| !t.is_empty()),
            scope: response.scope,
            id_token: response.id_token,
        })
    }

    /// Checks whether the token is expired, with a one minute margin.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|exp| Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS) >= exp)
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Sets the expiration time.
    #[must_use]
    pub const fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Returns the refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRefreshToken`] if the provider did not issue one.
    pub fn refresh_token(&self) -> Result<&str> {
        self.refresh_token.as_deref().ok_or(Error::NoRefreshToken)
    }
}

/// Successful token endpoint response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Token type.
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u32>,
    /// Refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Granted scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Identity token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Error body from a token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub error: String,
    /// Error description.
    #[serde(default)]
    pub error_description: String,
}

impl ErrorResponse {
    /// Converts to an [`Error::OAuth`].
    #[must_use]
    pub fn into_error(self) -> Error {
        Error::oauth_error(self.error, self.error_description)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn response(refresh: Option<&str>) -> TokenResponse {
        TokenResponse {
            access_token: "ya29.access".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: Some(3599),
            refresh_token: refresh.map(str::to_string),
            scope: Some("https://mail.google.com/".to_string()),
            id_token: None,
        }
    }

    #[test]
    fn test_from_response() {
        let token = Token::from_response(response(Some("1//refresh"))).unwrap();
        assert_eq!(token.access_token, "ya29.access");
        assert_eq!(token.refresh_token().unwrap(), "1//refresh");
        assert!(token.expires_at.is_some());
        assert!(!token.is_expired());
    }

    #[test]
    fn test_empty_refresh_token_is_dropped() {
        let token = Token::from_response(response(Some(""))).unwrap();
        assert!(matches!(token.refresh_token(), Err(Error::NoRefreshToken)));
    }

    #[test]
    fn test_empty_access_token_rejected() {
        let mut bad = response(None);
        bad.access_token.clear();
        assert!(matches!(
            Token::from_response(bad),
            Err(Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_expiry_margin() {
        let almost = Token::bearer("t").with_expires_at(Utc::now() + Duration::seconds(30));
        assert!(almost.is_expired());

        let fresh = Token::bearer("t").with_expires_at(Utc::now() + Duration::seconds(3600));
        assert!(!fresh.is_expired());

        assert!(!Token::bearer("t").is_expired());
    }

    #[test]
    fn test_response_defaults() {
        let parsed: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(parsed.token_type, "Bearer");
        assert!(parsed.expires_in.is_none());
        assert!(parsed.refresh_token.is_none());
    }

    #[test]
    fn test_error_response_conversion() {
        let parsed: ErrorResponse =
            serde_json::from_str(r#"{"error":"invalid_grant"}"#).unwrap();
        let err = parsed.into_error();
        assert!(matches!(err, Error::OAuth { ref error, .. } if error == "invalid_grant"));
    }
}
