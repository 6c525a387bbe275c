//! `OAuth2` endpoint and scope configuration per mail provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// Scopes requested from Google when linking a Gmail account.
pub const GOOGLE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
    "https://mail.google.com/",
];

/// Scopes requested from Microsoft when linking an Office365 account.
pub const MICROSOFT_SCOPES: &[&str] = &[
    "openid",
    "offline_access",
    "User.Read",
    "https://outlook.office365.com/EWS.AccessAsUser.All",
    "https://outlook.office365.com/EAS.AccessAsUser.All",
];

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const GOOGLE_TOKEN_URL: &str = "https://www.googleapis.com/oauth2/v4/token";
const MICROSOFT_AUTH_URL: &str = "https://login.microsoftonline.com/common/oauth2/v2.0/authorize";
const MICROSOFT_TOKEN_URL: &str = "https://login.microsoftonline.com/common/oauth2/v2.0/token";

/// Mail provider an account can be linked through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gmail.
    Gmail,
    /// Microsoft Office365.
    Office365,
}

impl ProviderKind {
    /// All supported provider kinds.
    pub const ALL: [Self; 2] = [Self::Gmail, Self::Office365];

    /// Wire name of the provider (`gmail` / `office365`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gmail => "gmail",
            Self::Office365 => "office365",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "gmail" => Ok(Self::Gmail),
            "office365" => Ok(Self::Office365),
            other => Err(Error::UnknownProvider(other.to_string())),
        }
    }
}

/// `OAuth2` provider configuration.
#[derive(Debug, Clone)]
pub struct Provider {
    /// Which provider this configuration belongs to.
    pub kind: ProviderKind,
    /// Authorization endpoint URL.
    pub auth_url: Url,
    /// Token endpoint URL.
    pub token_url: Url,
    /// Scopes requested during authorization.
    pub scopes: Vec<String>,
    /// Extra query parameters for the authorization request.
    pub params: Vec<(String, String)>,
    /// Extra headers for token endpoint requests.
    pub header_params: Vec<(String, String)>,
}

impl Provider {
    /// Creates a provider configuration with no scopes or extra parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if URLs are invalid.
    pub fn new(
        kind: ProviderKind,
        auth_url: impl AsRef<str>,
        token_url: impl AsRef<str>,
    ) -> Result<Self> {
        Ok(Self {
            kind,
            auth_url: Url::parse(auth_url.as_ref())?,
            token_url: Url::parse(token_url.as_ref())?,
            scopes: Vec::new(),
            params: Vec::new(),
            header_params: Vec::new(),
        })
    }

    /// Sets the requested scopes.
    #[must_use]
    pub fn with_scopes<S: AsRef<str>>(mut self, scopes: &[S]) -> Self {
        self.scopes = scopes.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Adds an authorization request parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Adds a token request header.
    #[must_use]
    pub fn with_header_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_params.push((name.into(), value.into()));
        self
    }

    /// Gmail configuration.
    ///
    /// Requests offline access so Google issues a refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn gmail() -> Result<Self> {
        Ok(Self::new(ProviderKind::Gmail, GOOGLE_AUTH_URL, GOOGLE_TOKEN_URL)?
            .with_scopes(GOOGLE_SCOPES)
            .with_param("access_type", "offline"))
    }

    /// Office365 configuration.
    ///
    /// Microsoft's token endpoint only accepts form-encoded bodies.
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn office365() -> Result<Self> {
        Ok(
            Self::new(ProviderKind::Office365, MICROSOFT_AUTH_URL, MICROSOFT_TOKEN_URL)?
                .with_scopes(MICROSOFT_SCOPES)
                .with_header_param("Content-Type", "application/x-www-form-urlencoded"),
        )
    }

    /// Configuration for the given provider kind.
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn for_kind(kind: ProviderKind) -> Result<Self> {
        match kind {
            ProviderKind::Gmail => Self::gmail(),
            ProviderKind::Office365 => Self::office365(),
        }
    }

    /// Looks up a configuration by raw provider name.
    ///
    /// Returns `None` for names that are not a supported provider kind.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        let kind = name.parse().ok()?;
        Self::for_kind(kind).ok()
    }

    /// Space-separated scope string as sent in authorization requests.
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }

    /// Returns the value of an authorization parameter, if set.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        find_pair(&self.params, name)
    }

    /// Returns the value of a token request header, if set.
    #[must_use]
    pub fn header_param(&self, name: &str) -> Option<&str> {
        find_pair(&self.header_params, name)
    }
}

fn find_pair<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
