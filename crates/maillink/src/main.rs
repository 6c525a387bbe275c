//! `maillink` - link Gmail and Office365 accounts through an email
//! aggregation service and drive its API from the command line.
//!
//! Configuration comes from the environment (`NYLAS_CLIENT_ID`,
//! `NYLAS_CLIENT_SECRET`, `ENCRYPTION_KEY`, provider client credentials and
//! `DOMAIN`). Results go to stdout, logs to stderr.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use maillink_core::{ProviderKind, Settings};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Mail account linking and aggregation API client.
#[derive(Parser)]
#[command(name = "maillink", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show which credentials are configured.
    Check,

    /// Print the provider consent URL.
    AuthUrl {
        /// Provider (`gmail` or `office365`).
        provider: ProviderKind,
        /// Opaque state echoed back to the callback.
        #[arg(long)]
        state: Option<String>,
    },

    /// Link an account with its provider refresh token.
    Connect {
        /// Provider (`gmail` or `office365`).
        provider: ProviderKind,
        /// Display name of the account owner.
        #[arg(long)]
        name: String,
        /// Email address of the account.
        #[arg(long)]
        email: String,
        /// Provider refresh token.
        #[arg(long)]
        refresh_token: String,
    },

    /// Encrypt a password with `ENCRYPTION_KEY`.
    Encrypt {
        /// Plaintext password.
        password: String,
    },

    /// Decrypt an `ivHex:cipherHex` value with `ENCRYPTION_KEY`.
    Decrypt {
        /// Encrypted value.
        value: String,
    },

    /// Verify a webhook body against its `x-nylas-signature`.
    Verify {
        /// Signature header value.
        #[arg(long)]
        signature: String,
        /// File holding the raw request body; stdin if omitted.
        body: Option<PathBuf>,
        /// Print the parsed deltas of a valid body.
        #[arg(long)]
        parse: bool,
    },

    /// Forward a `resource.action` request, e.g. `threads.list`.
    Request {
        /// Operation selector.
        selector: String,
        /// Account access token.
        #[arg(long)]
        token: String,
        /// Object id for `find` and `delete`.
        #[arg(long)]
        id: Option<String>,
        /// Query parameter as `name=value`; repeatable.
        #[arg(long = "param", value_parser = commands::parse_param)]
        params: Vec<(String, String)>,
    },

    /// Send a message.
    Send(commands::SendArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maillink=info,maillink_core=debug,maillink_oauth=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    debug!(?settings, "Loaded settings");

    match cli.command {
        Command::Check => commands::check(&settings),
        Command::AuthUrl { provider, state } => {
            commands::auth_url(&settings, provider, state.as_deref())
        }
        Command::Connect {
            provider,
            name,
            email,
            refresh_token,
        } => commands::connect(&settings, provider, name, email, refresh_token).await,
        Command::Encrypt { password } => commands::encrypt(&settings, &password),
        Command::Decrypt { value } => commands::decrypt(&settings, &value),
        Command::Verify {
            signature,
            body,
            parse,
        } => commands::verify(&settings, &signature, body.as_deref(), parse),
        Command::Request {
            selector,
            token,
            id,
            params,
        } => commands::request(&settings, &selector, &token, id, params).await,
        Command::Send(args) => commands::send(&settings, args).await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_request_with_params() {
        let cli = Cli::try_parse_from([
            "maillink",
            "request",
            "threads.list",
            "--token",
            "abc",
            "--param",
            "in=inbox",
            "--param",
            "limit=5",
        ])
        .unwrap_or_else(|err| panic!("{err}"));

        let Command::Request { params, token, .. } = cli.command else {
            panic!("expected request");
        };
        assert_eq!(token, "abc");
        assert_eq!(
            params,
            vec![
                ("in".to_string(), "inbox".to_string()),
                ("limit".to_string(), "5".to_string())
            ]
        );
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(Cli::try_parse_from(["maillink", "auth-url", "yahoo"]).is_err());
    }
}
