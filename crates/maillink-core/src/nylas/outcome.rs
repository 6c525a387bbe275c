//! Soft-failure results of service calls.

use std::fmt;

use super::error::NylasError;

/// Why a call was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Client id or secret is not configured.
    MissingCredentials,
    /// Access token is empty.
    MissingToken,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredentials => f.write_str("service credentials are not configured"),
            Self::MissingToken => f.write_str("access token is empty"),
        }
    }
}

/// Result of a call to the aggregation service.
///
/// Failures are already logged where they happen; callers that only care
/// about the value can use [`Outcome::ok`].
#[must_use]
#[derive(Debug)]
pub enum Outcome<T> {
    /// Call succeeded.
    Done(T),
    /// No session could be established, so nothing was sent.
    Skipped(SkipReason),
    /// Call was made and failed.
    Failed(NylasError),
}

impl<T> Outcome<T> {
    /// Value of a successful call.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Done(value) => Some(value),
            Self::Skipped(_) | Self::Failed(_) => None,
        }
    }

    /// Whether the call succeeded.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }

    /// Whether the call was skipped.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    /// Whether the call failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Error of a failed call.
    #[must_use]
    pub const fn error(&self) -> Option<&NylasError> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Done(_) | Self::Skipped(_) => None,
        }
    }

    /// Maps the value of a successful call.
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Done(value) => Outcome::Done(f(value)),
            Self::Skipped(reason) => Outcome::Skipped(reason),
            Self::Failed(err) => Outcome::Failed(err),
        }
    }

    /// Converts to a `Result`, with a skipped call as `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the error of a failed call.
    pub fn into_result(self) -> Result<Option<T>, NylasError> {
        match self {
            Self::Done(value) => Ok(Some(value)),
            Self::Skipped(_) => Ok(None),
            Self::Failed(err) => Err(err),
        }
    }
}

impl<T> From<Result<T, NylasError>> for Outcome<T> {
    fn from(result: Result<T, NylasError>) -> Self {
        match result {
            Ok(value) => Self::Done(value),
            Err(err) => Self::Failed(err),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_done() {
        let outcome = Outcome::Done(2).map(|n| n * 2);
        assert!(outcome.is_done());
        assert!(outcome.error().is_none());
        assert_eq!(outcome.ok(), Some(4));
    }

    #[test]
    fn test_skipped_is_ok_none() {
        let outcome: Outcome<u8> = Outcome::Skipped(SkipReason::MissingToken);
        assert!(outcome.is_skipped());
        assert!(outcome.into_result().unwrap().is_none());
    }

    #[test]
    fn test_failed_keeps_error() {
        let outcome: Outcome<u8> = Err(NylasError::NoRecipients).into();
        assert!(outcome.is_failed());
        assert!(matches!(outcome.error(), Some(NylasError::NoRecipients)));
        assert!(matches!(
            outcome.into_result(),
            Err(NylasError::NoRecipients)
        ));
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(
            SkipReason::MissingCredentials.to_string(),
            "service credentials are not configured"
        );
    }
}
