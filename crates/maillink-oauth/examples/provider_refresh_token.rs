//! Example: obtain a provider refresh token for account linking
//!
//! The aggregation service links Gmail and Office365 accounts from a
//! provider refresh token. This example walks through getting one by hand:
//! 1. Print the consent URL for the chosen provider
//! 2. Read the authorization code from the redirect
//! 3. Exchange it for tokens and print the refresh token
//!
//! ## Running
//!
//! ```bash
//! export OAUTH_CLIENT_ID="your-client-id"
//! export OAUTH_CLIENT_SECRET="your-client-secret"
//! export OAUTH_REDIRECT_URI="https://app.example.com/nylas/oauth/gmail/callback"
//! cargo run --package maillink-oauth --example provider_refresh_token -- gmail
//! ```

use maillink_oauth::{OAuthClient, Provider, ProviderKind};
use std::env;
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let kind: ProviderKind = env::args()
        .nth(1)
        .unwrap_or_else(|| "gmail".to_string())
        .parse()?;
    let client_id = env::var("OAUTH_CLIENT_ID")?;
    let client_secret = env::var("OAUTH_CLIENT_SECRET")?;
    let redirect_uri = env::var("OAUTH_REDIRECT_URI")?;

    let provider = Provider::for_kind(kind)?;
    println!("Provider: {kind}");
    println!("  Auth URL:  {}", provider.auth_url);
    println!("  Token URL: {}", provider.token_url);
    println!("  Scopes:    {}\n", provider.scope_string());

    let client = OAuthClient::new(client_id, provider)
        .with_client_secret(client_secret)
        .with_redirect_uri(redirect_uri);

    let state = format!("state-{}", chrono::Utc::now().timestamp());
    println!(
        "Visit this URL to authorize:\n\n{}\n",
        client.authorization_url(None, Some(state.as_str()))
    );

    print!("Authorization code from the redirect: ");
    io::stdout().flush()?;
    let mut code = String::new();
    io::stdin().read_line(&mut code)?;
    let code = code.trim();

    if code.is_empty() {
        println!("No code entered. Exiting.");
        return Ok(());
    }

    let token = client.exchange_code(code).await?;
    println!("\nToken type: {}", token.token_type);
    println!("Expires at: {:?}", token.expires_at);
    match token.refresh_token() {
        Ok(refresh) => println!("Refresh token: {refresh}"),
        Err(e) => println!("No refresh token issued: {e}"),
    }

    Ok(())
}
