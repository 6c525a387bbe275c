//! Outgoing messages.

use serde::{Deserialize, Serialize};

use crate::address::{EmailAddress, build_email_addresses};

/// A message to send.
///
/// Address setters take comma-separated lists and append to what is
/// already set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Draft {
    /// Sender.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub from: Vec<EmailAddress>,
    /// Primary recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<EmailAddress>,
    /// Carbon-copy recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<EmailAddress>,
    /// Blind carbon-copy recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<EmailAddress>,
    /// Reply-To addresses.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reply_to: Vec<EmailAddress>,
    /// Subject line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// HTML body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Message this one replies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<String>,
    /// Ids of previously uploaded attachments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_ids: Vec<String>,
}

fn addresses(list: &str) -> Vec<EmailAddress> {
    build_email_addresses(Some(list)).unwrap_or_default()
}

impl Draft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds senders.
    #[must_use]
    pub fn with_from(mut self, list: &str) -> Self {
        self.from.extend(addresses(list));
        self
    }

    /// Adds primary recipients.
    #[must_use]
    pub fn with_to(mut self, list: &str) -> Self {
        self.to.extend(addresses(list));
        self
    }

    /// Adds carbon-copy recipients.
    #[must_use]
    pub fn with_cc(mut self, list: &str) -> Self {
        self.cc.extend(addresses(list));
        self
    }

    /// Adds blind carbon-copy recipients.
    #[must_use]
    pub fn with_bcc(mut self, list: &str) -> Self {
        self.bcc.extend(addresses(list));
        self
    }

    /// Adds Reply-To addresses.
    #[must_use]
    pub fn with_reply_to(mut self, list: &str) -> Self {
        self.reply_to.extend(addresses(list));
        self
    }

    /// Sets the subject.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Marks the draft as a reply to `message_id`.
    #[must_use]
    pub fn in_reply_to(mut self, message_id: impl Into<String>) -> Self {
        self.reply_to_message_id = Some(message_id.into());
        self
    }

    /// Attaches an uploaded file.
    #[must_use]
    pub fn with_file_id(mut self, file_id: impl Into<String>) -> Self {
        self.file_ids.push(file_id.into());
        self
    }

    /// Whether any to, cc or bcc recipient is set.
    #[must_use]
    pub fn has_recipients(&self) -> bool {
        !(self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty())
    }
}

/// Message the service accepted for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SentMessage {
    /// Message id.
    pub id: String,
    /// Thread the message was filed into.
    #[serde(default)]
    pub thread_id: Option<String>,
    /// Subject as sent.
    #[serde(default)]
    pub subject: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_only_set_fields() {
        let draft = Draft::new()
            .with_from("me@example.com")
            .with_to("a@x.com, b@y.com")
            .with_subject("Hello")
            .with_body("<p>Hi</p>")
            .with_file_id("f1");

        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({
                "from": [{ "email": "me@example.com" }],
                "to": [{ "email": "a@x.com" }, { "email": "b@y.com" }],
                "subject": "Hello",
                "body": "<p>Hi</p>",
                "file_ids": ["f1"],
            })
        );
    }

    #[test]
    fn test_reply_fields() {
        let draft = Draft::new()
            .with_to("a@x.com")
            .with_reply_to("replies@example.com")
            .in_reply_to("msg-1");
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["reply_to_message_id"], "msg-1");
        assert_eq!(value["reply_to"], json!([{ "email": "replies@example.com" }]));
    }

    #[test]
    fn test_recipients() {
        assert!(!Draft::new().with_from("me@example.com").has_recipients());
        assert!(!Draft::new().with_to(",,").has_recipients());
        assert!(Draft::new().with_bcc("hidden@example.com").has_recipients());
    }

    #[test]
    fn test_sent_message_from_response() {
        let sent: SentMessage = serde_json::from_value(json!({
            "id": "m-1",
            "object": "message",
            "thread_id": "t-1",
            "subject": "Hello",
            "to": [{ "email": "a@x.com", "name": "" }],
        }))
        .unwrap();
        assert_eq!(sent.id, "m-1");
        assert_eq!(sent.thread_id.as_deref(), Some("t-1"));
    }
}
