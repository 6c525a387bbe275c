//! # maillink-oauth
//!
//! `OAuth2` plumbing for linking Gmail and Office365 accounts to an email
//! aggregation service.
//!
//! ## Features
//!
//! - **Provider configurations**: fixed authorization/token endpoints, scopes
//!   and provider-specific request parameters for Gmail and Office365
//! - **Authorization URL**: consent URL with redirect URI, scopes and state
//! - **Token exchange**: authorization code exchange and refresh
//!
//! ## Quick Start
//!
//! ```ignore
//! use maillink_oauth::{OAuthClient, Provider, ProviderKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = Provider::for_kind(ProviderKind::Gmail)?;
//!     let client = OAuthClient::new("your_client_id", provider)
//!         .with_client_secret("your_secret")
//!         .with_redirect_uri("https://app.example.com/nylas/oauth/gmail/callback");
//!
//!     println!("Visit: {}", client.authorization_url(None, Some("state")));
//!
//!     let token = client.exchange_code("code_from_redirect").await?;
//!     println!("Refresh token: {}", token.refresh_token()?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
pub mod flow;
pub mod provider;
pub mod token;

pub use error::{Error, Result};
pub use flow::OAuthClient;
pub use provider::{GOOGLE_SCOPES, MICROSOFT_SCOPES, Provider, ProviderKind};
pub use token::Token;
