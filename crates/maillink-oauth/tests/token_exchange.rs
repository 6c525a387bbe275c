//! Token endpoint tests against a mock `OAuth2` server.

#![allow(clippy::unwrap_used)]

use maillink_oauth::{Error, OAuthClient, Provider, ProviderKind, Token};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_provider(server: &MockServer, kind: ProviderKind) -> Provider {
    let provider = Provider::new(
        kind,
        format!("{}/authorize", server.uri()),
        format!("{}/token", server.uri()),
    )
    .unwrap();

    match kind {
        ProviderKind::Gmail => provider.with_param("access_type", "offline"),
        ProviderKind::Office365 => {
            provider.with_header_param("Content-Type", "application/x-www-form-urlencoded")
        }
    }
}

#[tokio::test]
async fn exchange_code_returns_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code"))
        .and(body_string_contains("client_secret=shh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.access",
            "token_type": "Bearer",
            "expires_in": 3599,
            "refresh_token": "1//refresh",
            "scope": "https://mail.google.com/"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OAuthClient::new("client-id", mock_provider(&server, ProviderKind::Gmail))
        .with_client_secret("shh")
        .with_redirect_uri("https://app.example.com/nylas/oauth/gmail/callback");

    let token = client.exchange_code("auth-code").await.unwrap();
    assert_eq!(token.access_token, "ya29.access");
    assert_eq!(token.refresh_token().unwrap(), "1//refresh");
    assert!(!token.is_expired());
}

#[tokio::test]
async fn office365_exchange_is_form_encoded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "eyJ0eXAi",
            "token_type": "Bearer",
            "refresh_token": "M.R3_BAY"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OAuthClient::new("client-id", mock_provider(&server, ProviderKind::Office365));
    let token = client.exchange_code("auth-code").await.unwrap();
    assert_eq!(token.refresh_token.as_deref(), Some("M.R3_BAY"));
}

#[tokio::test]
async fn provider_error_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Bad Request"
        })))
        .mount(&server)
        .await;

    let client = OAuthClient::new("client-id", mock_provider(&server, ProviderKind::Gmail));
    let err = client.exchange_code("stale").await.unwrap_err();

    match err {
        Error::OAuth { error, description } => {
            assert_eq!(error, "invalid_grant");
            assert_eq!(description, "Bad Request");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = OAuthClient::new("client-id", mock_provider(&server, ProviderKind::Gmail));
    let err = client.exchange_code("code").await.unwrap_err();
    assert!(matches!(err, Error::InvalidResponse(_)));
}

#[tokio::test]
async fn refresh_keeps_existing_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=1%2F%2Frefresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.new",
            "expires_in": 3599
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OAuthClient::new("client-id", mock_provider(&server, ProviderKind::Gmail));
    let old = Token::bearer("ya29.old").with_refresh_token("1//refresh");

    let refreshed = client.refresh(&old).await.unwrap();
    assert_eq!(refreshed.access_token, "ya29.new");
    assert_eq!(refreshed.refresh_token.as_deref(), Some("1//refresh"));
}

#[tokio::test]
async fn refresh_without_refresh_token_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = OAuthClient::new("client-id", mock_provider(&server, ProviderKind::Gmail));
    let err = client.refresh(&Token::bearer("only-access")).await.unwrap_err();
    assert!(matches!(err, Error::NoRefreshToken));
}
