//! Environment-derived configuration.
//!
//! [`Settings`] is read once at startup and handed to every operation that
//! needs it; nothing in this crate reads the environment on its own.

use std::fmt;

use maillink_oauth::ProviderKind;
use url::Url;

/// Aggregation service client id.
pub const NYLAS_CLIENT_ID: &str = "NYLAS_CLIENT_ID";
/// Aggregation service client secret, also the webhook signing secret.
pub const NYLAS_CLIENT_SECRET: &str = "NYLAS_CLIENT_SECRET";
/// Base URL of the aggregation service API.
pub const NYLAS_API_URL: &str = "NYLAS_API_URL";
/// Key for password encryption (32 bytes).
pub const ENCRYPTION_KEY: &str = "ENCRYPTION_KEY";
/// Google `OAuth2` client id.
pub const GOOGLE_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
/// Google `OAuth2` client secret.
pub const GOOGLE_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
/// Microsoft `OAuth2` client id.
pub const MICROSOFT_CLIENT_ID: &str = "MICROSOFT_CLIENT_ID";
/// Microsoft `OAuth2` client secret.
pub const MICROSOFT_CLIENT_SECRET: &str = "MICROSOFT_CLIENT_SECRET";
/// Public base URL of the application, used for OAuth callbacks.
pub const DOMAIN: &str = "DOMAIN";

/// Default aggregation service API.
pub const DEFAULT_NYLAS_API_URL: &str = "https://api.nylas.com";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required variable is unset or empty.
    #[error("{0} is not set")]
    Missing(&'static str),

    /// Variable holds something that is not a URL.
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        /// Variable name.
        var: &'static str,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
}

/// Client credentials of an app registered with a mail provider.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OAuthApp {
    /// Client id.
    pub client_id: Option<String>,
    /// Client secret.
    pub client_secret: Option<String>,
}

impl fmt::Debug for OAuthApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthApp")
            .field("client_id", &self.client_id)
            .field("client_secret", &redacted(self.client_secret.as_ref()))
            .finish()
    }
}

/// Application configuration.
#[derive(Clone)]
pub struct Settings {
    /// Aggregation service client id.
    pub nylas_client_id: Option<String>,
    /// Aggregation service client secret.
    pub nylas_client_secret: Option<String>,
    /// Aggregation service API base URL.
    pub nylas_api_url: Url,
    /// Password encryption key.
    pub encryption_key: Option<String>,
    /// Google app credentials.
    pub google: OAuthApp,
    /// Microsoft app credentials.
    pub microsoft: OAuthApp,
    /// Public base URL of the application.
    pub domain: Option<String>,
}

impl Settings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `NYLAS_API_URL` is set but is not a valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, treating empty values as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `NYLAS_API_URL` is set but is not a valid URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_url = get(NYLAS_API_URL).unwrap_or_else(|| DEFAULT_NYLAS_API_URL.to_string());
        let nylas_api_url = Url::parse(&api_url).map_err(|source| ConfigError::InvalidUrl {
            var: NYLAS_API_URL,
            source,
        })?;

        Ok(Self {
            nylas_client_id: get(NYLAS_CLIENT_ID),
            nylas_client_secret: get(NYLAS_CLIENT_SECRET),
            nylas_api_url,
            encryption_key: get(ENCRYPTION_KEY),
            google: OAuthApp {
                client_id: get(GOOGLE_CLIENT_ID),
                client_secret: get(GOOGLE_CLIENT_SECRET),
            },
            microsoft: OAuthApp {
                client_id: get(MICROSOFT_CLIENT_ID),
                client_secret: get(MICROSOFT_CLIENT_SECRET),
            },
            domain: get(DOMAIN),
        })
    }

    /// Whether both aggregation service credentials are configured.
    #[must_use]
    pub const fn has_nylas_credentials(&self) -> bool {
        self.nylas_client_id.is_some() && self.nylas_client_secret.is_some()
    }

    /// Credentials of the app registered with `kind`.
    #[must_use]
    pub const fn oauth_app(&self, kind: ProviderKind) -> &OAuthApp {
        match kind {
            ProviderKind::Gmail => &self.google,
            ProviderKind::Office365 => &self.microsoft,
        }
    }

    /// Returns the configured domain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if `DOMAIN` is unset.
    pub fn domain(&self) -> Result<&str, ConfigError> {
        self.domain.as_deref().ok_or(ConfigError::Missing(DOMAIN))
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("nylas_client_id", &self.nylas_client_id)
            .field(
                "nylas_client_secret",
                &redacted(self.nylas_client_secret.as_ref()),
            )
            .field("nylas_api_url", &self.nylas_api_url.as_str())
            .field("encryption_key", &redacted(self.encryption_key.as_ref()))
            .field("google", &self.google)
            .field("microsoft", &self.microsoft)
            .field("domain", &self.domain)
            .finish()
    }
}

const fn redacted(value: Option<&String>) -> Option<&'static str> {
    match value {
        Some(_) => Some("<redacted>"),
        None => None,
    }
}
