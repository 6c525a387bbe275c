#![allow(clippy::uninlined_format_args)]
//! Example: list recent threads of a linked account
//!
//! Reads the service credentials from the environment and forwards a
//! `threads.list` request for one account's access token.
//!
//! ## Running
//!
//! ```bash
//! export NYLAS_CLIENT_ID="your-client-id"
//! export NYLAS_CLIENT_SECRET="your-client-secret"
//! cargo run --package maillink-core --example list_threads -- <access-token>
//! ```

use maillink_core::{Filter, NylasClient, Outcome, Settings, forward_request};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let access_token = env::args().nth(1).unwrap_or_default();
    let settings = Settings::from_env()?;
    let client = NylasClient::new(&settings);

    let filter = Filter::new().with_param("in", "inbox").with_param("limit", "5");

    match forward_request(&client, &access_token, "threads", "list", Some(&filter)).await {
        Outcome::Done(threads) => {
            for thread in threads.as_array().into_iter().flatten() {
                println!(
                    "{}  {}",
                    thread["id"].as_str().unwrap_or("-"),
                    thread["subject"].as_str().unwrap_or("(no subject)")
                );
            }
        }
        Outcome::Skipped(reason) => eprintln!("Skipped: {}", reason),
        Outcome::Failed(err) => return Err(err.into()),
    }

    Ok(())
}
