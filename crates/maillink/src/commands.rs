//! Subcommand handlers.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, bail};
use clap::Args;
use maillink_core::{
    ConnectRequest, Draft, Filter, NylasClient, Outcome, ProviderKind, Settings, check_credentials,
    decrypt_password, encrypt_password, forward_request, parse_notification, send_message,
    verify_request,
};
use serde_json::json;

/// Arguments of `send`.
#[derive(Args)]
pub struct SendArgs {
    /// Account access token.
    #[arg(long)]
    token: String,
    /// Comma-separated recipients.
    #[arg(long, default_value = "")]
    to: String,
    /// Comma-separated carbon-copy recipients.
    #[arg(long, default_value = "")]
    cc: String,
    /// Comma-separated blind carbon-copy recipients.
    #[arg(long, default_value = "")]
    bcc: String,
    /// Sender address.
    #[arg(long, default_value = "")]
    from: String,
    /// Reply-To addresses.
    #[arg(long, default_value = "")]
    reply_to: String,
    /// Subject line.
    #[arg(long)]
    subject: Option<String>,
    /// Message body.
    #[arg(long)]
    body: Option<String>,
    /// Id of the message being replied to.
    #[arg(long)]
    reply_to_message_id: Option<String>,
    /// Uploaded attachment id; repeatable.
    #[arg(long = "file-id")]
    file_ids: Vec<String>,
}

/// Parses a `name=value` query parameter.
pub fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected name=value, got `{raw}`")),
    }
}

fn finish<T>(outcome: Outcome<T>) -> anyhow::Result<T> {
    match outcome {
        Outcome::Done(value) => Ok(value),
        Outcome::Skipped(reason) => bail!("Skipped: {reason}"),
        Outcome::Failed(err) => Err(err.into()),
    }
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn check(settings: &Settings) -> anyhow::Result<()> {
    let yes_no = |set: bool| if set { "configured" } else { "missing" };

    println!("nylas credentials: {}", yes_no(check_credentials(settings)));
    println!("nylas api:         {}", settings.nylas_api_url);
    println!(
        "encryption key:    {}",
        yes_no(settings.encryption_key.is_some())
    );
    for kind in ProviderKind::ALL {
        println!(
            "{:<18} {}",
            format!("{kind}:"),
            yes_no(settings.client_config(kind).is_ok())
        );
    }
    println!("domain:            {}", settings.domain.as_deref().unwrap_or("missing"));
    Ok(())
}

pub fn auth_url(settings: &Settings, kind: ProviderKind, state: Option<&str>) -> anyhow::Result<()> {
    let client = settings.oauth_client(kind)?;
    println!("{}", client.authorization_url(None, state));
    Ok(())
}

pub async fn connect(
    settings: &Settings,
    kind: ProviderKind,
    name: String,
    email: String,
    refresh_token: String,
) -> anyhow::Result<()> {
    let request = ConnectRequest::new(kind, name, email, refresh_token);
    let account = finish(NylasClient::new(settings).connect_account(&request).await)?;

    print_json(&json!({
        "account_id": account.account_id,
        "email_address": account.email_address,
        "provider": account.provider,
        "access_token": account.access_token,
    }))
}

pub fn encrypt(settings: &Settings, password: &str) -> anyhow::Result<()> {
    println!("{}", encrypt_password(settings, password)?);
    Ok(())
}

pub fn decrypt(settings: &Settings, value: &str) -> anyhow::Result<()> {
    println!("{}", decrypt_password(settings, value)?);
    Ok(())
}

fn read_body(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    if let Some(path) = path {
        return std::fs::read(path).with_context(|| format!("reading {}", path.display()));
    }
    let mut body = Vec::new();
    std::io::stdin()
        .read_to_end(&mut body)
        .context("reading body from stdin")?;
    Ok(body)
}

pub fn verify(
    settings: &Settings,
    signature: &str,
    body: Option<&Path>,
    parse: bool,
) -> anyhow::Result<()> {
    let body = read_body(body)?;

    if !parse {
        if verify_request(settings, &body, Some(signature)) {
            println!("valid");
            return Ok(());
        }
        bail!("invalid signature");
    }

    let secret = settings
        .nylas_client_secret
        .as_deref()
        .context("NYLAS_CLIENT_SECRET is not set")?;
    let notification = parse_notification(secret, &body, Some(signature))?;
    for delta in &notification.deltas {
        let id = delta
            .object_data
            .as_ref()
            .and_then(|data| data.id.as_deref())
            .unwrap_or("-");
        println!(
            "{}\t{}\t{}",
            delta.trigger,
            delta.account_id().unwrap_or("-"),
            id
        );
    }
    Ok(())
}

pub async fn request(
    settings: &Settings,
    selector: &str,
    token: &str,
    id: Option<String>,
    params: Vec<(String, String)>,
) -> anyhow::Result<()> {
    let (parent, child) = selector
        .split_once('.')
        .with_context(|| format!("expected resource.action, got `{selector}`"))?;

    let filter = Filter {
        id,
        params: params.into_iter().collect(),
    };
    let client = NylasClient::new(settings);
    let value = finish(forward_request(&client, token, parent, child, Some(&filter)).await)?;
    print_json(&value)
}

pub async fn send(settings: &Settings, args: SendArgs) -> anyhow::Result<()> {
    let mut draft = Draft::new()
        .with_from(&args.from)
        .with_to(&args.to)
        .with_cc(&args.cc)
        .with_bcc(&args.bcc)
        .with_reply_to(&args.reply_to);
    draft.subject = args.subject;
    draft.body = args.body;
    draft.reply_to_message_id = args.reply_to_message_id;
    draft.file_ids = args.file_ids;

    let sent = finish(send_message(&NylasClient::new(settings), &args.token, &draft).await)?;
    println!("{}", sent.id);
    Ok(())
}
