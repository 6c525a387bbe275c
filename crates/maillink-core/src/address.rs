//! Recipient address lists.

use serde::{Deserialize, Serialize};

/// Email participant as the aggregation service represents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Address.
    pub email: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EmailAddress {
    /// Address without a display name.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Splits a comma-separated list into addresses, dropping empty segments.
///
/// Returns `None` for absent or empty input; a list of nothing but commas
/// yields an empty vector.
#[must_use]
pub fn build_email_addresses(emails: Option<&str>) -> Option<Vec<EmailAddress>> {
    let emails = emails.filter(|s| !s.is_empty())?;

    Some(
        emails
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(EmailAddress::new)
            .collect(),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_empty_segments() {
        let list = build_email_addresses(Some("a@x.com,,b@y.com")).unwrap();
        assert_eq!(
            list,
            vec![EmailAddress::new("a@x.com"), EmailAddress::new("b@y.com")]
        );
    }

    #[test]
    fn test_empty_input_is_absent() {
        assert!(build_email_addresses(Some("")).is_none());
        assert!(build_email_addresses(None).is_none());
    }

    #[test]
    fn test_only_separators_is_empty_list() {
        assert_eq!(build_email_addresses(Some(",,")), Some(Vec::new()));
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let list = build_email_addresses(Some(" a@x.com , b@y.com ,  ")).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].email, "a@x.com");
        assert_eq!(list[1].email, "b@y.com");
    }

    #[test]
    fn test_serializes_as_email_object() {
        let json = serde_json::to_value(build_email_addresses(Some("a@x.com")).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!([{ "email": "a@x.com" }]));

        let named = serde_json::to_value(EmailAddress::new("a@x.com").with_name("A")).unwrap();
        assert_eq!(named, serde_json::json!({ "email": "a@x.com", "name": "A" }));
    }
}
