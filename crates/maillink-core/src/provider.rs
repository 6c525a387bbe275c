//! Provider configuration resolution.
//!
//! Maps a [`ProviderKind`] to the configured client credentials and to the
//! parameter shapes the aggregation service and provider endpoints expect.

use maillink_oauth::{OAuthClient, Provider, ProviderKind};
use serde::Serialize;

use crate::config::{
    ConfigError, GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET, MICROSOFT_CLIENT_ID,
    MICROSOFT_CLIENT_SECRET, Settings,
};

/// Client id/secret pair for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Client id.
    pub client_id: String,
    /// Client secret.
    pub client_secret: String,
}

/// Provider settings as the aggregation service's connect endpoint takes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProviderSettings {
    /// Gmail native-auth settings.
    Gmail {
        /// Google client id.
        google_client_id: String,
        /// Google client secret.
        google_client_secret: String,
        /// Google refresh token of the account being linked.
        google_refresh_token: String,
    },
    /// Office365 native-auth settings.
    Office365 {
        /// Microsoft client id.
        microsoft_client_id: String,
        /// Microsoft client secret.
        microsoft_client_secret: String,
        /// Microsoft refresh token of the account being linked.
        microsoft_refresh_token: String,
        /// Callback registered with Microsoft.
        redirect_uri: String,
    },
}

impl Settings {
    /// Client credentials configured for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming the first unset variable.
    pub fn client_config(&self, kind: ProviderKind) -> Result<ClientConfig, ConfigError> {
        let (id_var, secret_var) = match kind {
            ProviderKind::Gmail => (GOOGLE_CLIENT_ID, GOOGLE_CLIENT_SECRET),
            ProviderKind::Office365 => (MICROSOFT_CLIENT_ID, MICROSOFT_CLIENT_SECRET),
        };
        let app = self.oauth_app(kind);

        Ok(ClientConfig {
            client_id: app.client_id.clone().ok_or(ConfigError::Missing(id_var))?,
            client_secret: app
                .client_secret
                .clone()
                .ok_or(ConfigError::Missing(secret_var))?,
        })
    }

    /// OAuth callback URL for `kind`: `{DOMAIN}/nylas/oauth/{kind}/callback`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if `DOMAIN` is unset.
    pub fn redirect_uri(&self, kind: ProviderKind) -> Result<String, ConfigError> {
        let domain = self.domain()?.trim_end_matches('/');
        Ok(format!("{domain}/nylas/oauth/{kind}/callback"))
    }

    /// Provider settings for linking an account holding `refresh_token`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if the provider's credentials are
    /// unset, or for Office365 if `DOMAIN` is unset.
    pub fn provider_settings(
        &self,
        kind: ProviderKind,
        refresh_token: &str,
    ) -> Result<ProviderSettings, ConfigError> {
        let ClientConfig {
            client_id,
            client_secret,
        } = self.client_config(kind)?;

        Ok(match kind {
            ProviderKind::Gmail => ProviderSettings::Gmail {
                google_client_id: client_id,
                google_client_secret: client_secret,
                google_refresh_token: refresh_token.to_string(),
            },
            ProviderKind::Office365 => ProviderSettings::Office365 {
                microsoft_client_id: client_id,
                microsoft_client_secret: client_secret,
                microsoft_refresh_token: refresh_token.to_string(),
                redirect_uri: self.redirect_uri(kind)?,
            },
        })
    }

    /// Provider `OAuth2` client with this app's credentials and callback.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials or `DOMAIN` are unset.
    pub fn oauth_client(&self, kind: ProviderKind) -> crate::Result<OAuthClient> {
        let ClientConfig {
            client_id,
            client_secret,
        } = self.client_config(kind)?;
        let redirect_uri = self.redirect_uri(kind)?;

        Ok(OAuthClient::new(client_id, Provider::for_kind(kind)?)
            .with_client_secret(client_secret)
            .with_redirect_uri(redirect_uri))
    }
}

/// OAuth endpoint and scope configuration for a raw provider name.
///
/// Returns `None` for names other than `gmail` and `office365`.
#[must_use]
pub fn provider_configs(name: &str) -> Option<Provider> {
    Provider::lookup(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::DOMAIN;

    fn settings(vars: &[(&'static str, &'static str)]) -> Settings {
        Settings::from_lookup(|name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        })
        .unwrap()
    }

    fn full() -> Settings {
        settings(&[
            (GOOGLE_CLIENT_ID, "g-id"),
            (GOOGLE_CLIENT_SECRET, "g-secret"),
            (MICROSOFT_CLIENT_ID, "m-id"),
            (MICROSOFT_CLIENT_SECRET, "m-secret"),
            (DOMAIN, "https://app.example.com/"),
        ])
    }

    #[test]
    fn test_client_config_per_kind() {
        let settings = full();
        assert_eq!(
            settings.client_config(ProviderKind::Gmail).unwrap(),
            ClientConfig {
                client_id: "g-id".into(),
                client_secret: "g-secret".into(),
            }
        );
        assert_eq!(
            settings
                .client_config(ProviderKind::Office365)
                .unwrap()
                .client_id,
            "m-id"
        );
    }

    #[test]
    fn test_client_config_names_missing_variable() {
        let settings = settings(&[(GOOGLE_CLIENT_ID, "g-id")]);
        let err = settings.client_config(ProviderKind::Gmail).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(var) if var == GOOGLE_CLIENT_SECRET));
    }

    #[test]
    fn test_gmail_settings_shape() {
        let value = serde_json::to_value(
            full()
                .provider_settings(ProviderKind::Gmail, "1//refresh")
                .unwrap(),
        )
        .unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "google_client_id": "g-id",
                "google_client_secret": "g-secret",
                "google_refresh_token": "1//refresh",
            })
        );
    }

    #[test]
    fn test_office365_settings_shape() {
        let value = serde_json::to_value(
            full()
                .provider_settings(ProviderKind::Office365, "M.R3")
                .unwrap(),
        )
        .unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "microsoft_client_id": "m-id",
                "microsoft_client_secret": "m-secret",
                "microsoft_refresh_token": "M.R3",
                "redirect_uri": "https://app.example.com/nylas/oauth/office365/callback",
            })
        );
    }

    #[test]
    fn test_office365_requires_domain() {
        let settings = settings(&[
            (MICROSOFT_CLIENT_ID, "m-id"),
            (MICROSOFT_CLIENT_SECRET, "m-secret"),
        ]);
        let err = settings
            .provider_settings(ProviderKind::Office365, "token")
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(var) if var == DOMAIN));

        let gmail = settings.provider_settings(ProviderKind::Gmail, "token");
        assert!(matches!(gmail, Err(ConfigError::Missing(var)) if var == GOOGLE_CLIENT_ID));
    }

    #[test]
    fn test_oauth_client_uses_callback() {
        let client = full().oauth_client(ProviderKind::Gmail).unwrap();
        assert_eq!(client.client_id, "g-id");
        assert_eq!(
            client.redirect_uri.as_deref(),
            Some("https://app.example.com/nylas/oauth/gmail/callback")
        );
    }

    #[test]
    fn test_provider_configs() {
        let gmail = provider_configs("gmail").unwrap();
        assert_eq!(gmail.auth_url.as_str(), "https://accounts.google.com/o/oauth2/auth");
        assert_eq!(gmail.token_url.as_str(), "https://www.googleapis.com/oauth2/v4/token");
        assert_eq!(gmail.param("access_type"), Some("offline"));

        let office = provider_configs("office365").unwrap();
        assert_eq!(
            office.auth_url.as_str(),
            "https://login.microsoftonline.com/common/oauth2/v2.0/authorize"
        );
        assert_eq!(
            office.header_param("Content-Type"),
            Some("application/x-www-form-urlencoded")
        );

        assert!(provider_configs("yahoo").is_none());
    }
}
