//! Aggregation service HTTP client.

use std::fmt;

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use super::draft::{Draft, SentMessage};
use super::error::NylasError;
use super::operation::{Filter, Operation};
use super::outcome::{Outcome, SkipReason};
use crate::config::Settings;

/// Client for the aggregation service.
///
/// Holds the shared HTTP client; per-account calls go through a
/// [`Session`].
#[derive(Debug, Clone)]
pub struct NylasClient {
    http: Client,
    settings: Settings,
}

impl NylasClient {
    /// Creates a client from settings.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: Client::new(),
            settings: settings.clone(),
        }
    }

    /// Uses a caller-supplied HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Settings this client was built from.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Whether the service client id and secret are configured.
    #[must_use]
    pub const fn check_credentials(&self) -> bool {
        self.settings.has_nylas_credentials()
    }

    /// Opens a session for an account's access token.
    ///
    /// Returns `None`, with a warning logged, if credentials are not
    /// configured or the token is empty.
    #[must_use]
    pub fn session(&self, access_token: &str) -> Option<Session> {
        self.try_session(access_token).ok()
    }

    pub(crate) fn try_session(&self, access_token: &str) -> Result<Session, SkipReason> {
        if !self.check_credentials() {
            warn!("Service credentials are not configured, skipping session");
            return Err(SkipReason::MissingCredentials);
        }
        if access_token.is_empty() {
            warn!("No access token, skipping session");
            return Err(SkipReason::MissingToken);
        }

        Ok(Session {
            http: self.http.clone(),
            api_url: self.settings.nylas_api_url.clone(),
            access_token: access_token.to_string(),
        })
    }

    pub(crate) fn post(&self, path: &[&str]) -> Result<RequestBuilder, NylasError> {
        Ok(self
            .http
            .post(endpoint(&self.settings.nylas_api_url, path)?))
    }
}

/// Authenticated access to one linked account.
#[derive(Clone)]
pub struct Session {
    http: Client,
    api_url: Url,
    access_token: String,
}

impl Session {
    /// Runs `operation` with `filter` and returns the JSON result.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation cannot be planned or the call fails.
    pub async fn execute(
        &self,
        operation: Operation,
        filter: &Filter,
    ) -> Result<Value, NylasError> {
        let call = operation.plan(filter)?;
        let segments: Vec<&str> = call.path.iter().map(String::as_str).collect();
        let body = self
            .call(call.method.clone(), &segments, &call.query, call.body.as_ref())
            .await?;

        debug!(%operation, "Service call succeeded");
        Ok(call.extract.apply(body))
    }

    /// Sends a draft.
    ///
    /// # Errors
    ///
    /// Returns [`NylasError::NoRecipients`] without calling the service if
    /// the draft has no recipients, otherwise any call failure.
    pub async fn send(&self, draft: &Draft) -> Result<SentMessage, NylasError> {
        if !draft.has_recipients() {
            return Err(NylasError::NoRecipients);
        }
        let body = serde_json::to_value(draft)?;
        let response = self.call(Method::POST, &["send"], &[], Some(&body)).await?;
        Ok(serde_json::from_value(response)?)
    }

    async fn call(
        &self,
        method: Method,
        path: &[&str],
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, NylasError> {
        let mut request = self
            .http
            .request(method, endpoint(&self.api_url, path)?)
            .bearer_auth(&self.access_token);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        read_json(request.send().await?).await
    }

    #[cfg(test)]
    pub(crate) fn url(&self, path: &[&str]) -> Result<Url, NylasError> {
        endpoint(&self.api_url, path)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("api_url", &self.api_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Appends `path` to the API base URL.
fn endpoint(base: &Url, path: &[&str]) -> Result<Url, NylasError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| NylasError::InvalidBaseUrl)?
        .pop_if_empty()
        .extend(path);
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Reads a JSON response, mapping non-success statuses to
/// [`NylasError::Api`]. An empty body reads as `null`.
pub(crate) async fn read_json(response: Response) -> Result<Value, NylasError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let (kind, message) = serde_json::from_str::<ApiErrorBody>(&text).map_or_else(
            |_| {
                (
                    None,
                    status.canonical_reason().unwrap_or("request failed").to_string(),
                )
            },
            |body| (body.kind, body.message),
        );
        return Err(NylasError::Api {
            status: status.as_u16(),
            kind,
            message,
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Whether the service client id and secret are configured.
#[must_use]
pub const fn check_credentials(settings: &Settings) -> bool {
    settings.has_nylas_credentials()
}

/// Forwards a `parent.child` request for the account holding `access_token`.
///
/// The session is checked first: with no credentials or token the call is
/// [`Outcome::Skipped`] and nothing is sent. An unknown selector or a
/// failed call is logged and returned as [`Outcome::Failed`].
pub async fn forward_request(
    client: &NylasClient,
    access_token: &str,
    parent: &str,
    child: &str,
    filter: Option<&Filter>,
) -> Outcome<Value> {
    let session = match client.try_session(access_token) {
        Ok(session) => session,
        Err(reason) => return Outcome::Skipped(reason),
    };

    let operation = match Operation::parse(parent, child) {
        Ok(operation) => operation,
        Err(err) => {
            warn!(parent, child, error = %err, "Rejected service request");
            return Outcome::Failed(err);
        }
    };

    let default_filter = Filter::default();
    match session
        .execute(operation, filter.unwrap_or(&default_filter))
        .await
    {
        Ok(value) => Outcome::Done(value),
        Err(err) => {
            warn!(%operation, error = %err, "Service request failed");
            Outcome::Failed(err)
        }
    }
}

/// Sends `draft` from the account holding `access_token`.
///
/// Logs the message id on success and the error on failure; never retries.
pub async fn send_message(
    client: &NylasClient,
    access_token: &str,
    draft: &Draft,
) -> Outcome<SentMessage> {
    let session = match client.try_session(access_token) {
        Ok(session) => session,
        Err(reason) => return Outcome::Skipped(reason),
    };

    match session.send(draft).await {
        Ok(sent) => {
            info!(message_id = %sent.id, "Sent message");
            Outcome::Done(sent)
        }
        Err(err) => {
            warn!(error = %err, "Failed to send message");
            Outcome::Failed(err)
        }
    }
}
