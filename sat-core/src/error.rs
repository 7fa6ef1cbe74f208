//! Error types for token parsing.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors from parsing or checking a scoped authentication token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The raw token could not be split, decoded, or interpreted.
    #[error("Token is invalid or malformed: {reason}")]
    Malformed { reason: String },

    /// The token parsed but its expiration instant has passed.
    ///
    /// Only raised by liveness checks, never while parsing.
    #[error("token expired at {expires}")]
    Expired { expires: DateTime<Utc> },
}

impl TokenError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        TokenError::Malformed {
            reason: reason.into(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, TokenError::Malformed { .. })
    }
}
