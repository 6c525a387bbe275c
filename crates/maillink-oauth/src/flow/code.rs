//! Authorization request URL.

use url::Url;

use super::OAuthClient;

impl OAuthClient {
    /// Builds the URL the user is sent to for consent.
    ///
    /// Uses the provider's scopes unless `scopes` is given, and appends the
    /// provider-specific parameters (e.g. `access_type=offline` for Gmail).
    #[must_use]
    pub fn authorization_url(&self, scopes: Option<&[String]>, state: Option<&str>) -> Url {
        let mut url = self.provider.auth_url.clone();

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("client_id", &self.client_id)
                .append_pair("response_type", "code");

            if let Some(redirect_uri) = &self.redirect_uri {
                pairs.append_pair("redirect_uri", redirect_uri);
            }

            let scope_str = scopes.map_or_else(|| self.provider.scope_string(), |s| s.join(" "));
            if !scope_str.is_empty() {
                pairs.append_pair("scope", &scope_str);
            }

            if let Some(state_val) = state {
                pairs.append_pair("state", state_val);
            }

            for (name, value) in &self.provider.params {
                pairs.append_pair(name, value);
            }
        }

        url
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::flow::OAuthClient;
    use crate::provider::Provider;

    #[test]
    fn test_gmail_authorization_url() {
        let client = OAuthClient::new("test_client", Provider::gmail().unwrap())
            .with_redirect_uri("https://app.example.com/nylas/oauth/gmail/callback");

        let url = client.authorization_url(None, Some("random_state"));
        let query = url.as_str();

        assert!(query.starts_with("https://accounts.google.com/o/oauth2/auth?"));
        assert!(query.contains("client_id=test_client"));
        assert!(query.contains("response_type=code"));
        assert!(query.contains("state=random_state"));
        assert!(query.contains("access_type=offline"));
        assert!(query.contains(
            "redirect_uri=https%3A%2F%2Fapp.example.com%2Fnylas%2Foauth%2Fgmail%2Fcallback"
        ));
        assert!(query.contains("scope=https%3A%2F%2Fwww.googleapis.com"));
    }

    #[test]
    fn test_office365_has_no_offline_param() {
        let client = OAuthClient::new("test_client", Provider::office365().unwrap());
        let url = client.authorization_url(None, None);

        assert!(!url.as_str().contains("access_type"));
        assert!(url.as_str().contains("offline_access"));
        assert!(!url.as_str().contains("state="));
    }

    #[test]
    fn test_custom_scopes_override_provider_scopes() {
        let client = OAuthClient::new("test_client", Provider::gmail().unwrap());
        let scopes = vec!["email".to_string(), "profile".to_string()];
        let url = client.authorization_url(Some(scopes.as_slice()), None);

        assert!(url.as_str().contains("scope=email+profile"));
        assert!(!url.as_str().contains("mail.google.com"));
    }
}
