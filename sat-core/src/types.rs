//! Core types for token parsing.
//!
//! Provides the decoded payload model, the capability triple derived from a
//! grant, and the `GrantMatcher` trait for pluggable grant interpretation.

use chrono::{DateTime, Utc};

/// A grant entry from the token payload: a resource and the actions allowed on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantEntry {
    /// Resource descriptor, e.g. `sip:alice@example.com`.
    pub res: String,
    /// Actions permitted on the resource.
    pub act: Vec<String>,
}

impl GrantEntry {
    pub fn new<I, S>(res: impl Into<String>, act: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            res: res.into(),
            act: act.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether the grant lists an action.
    pub fn allows(&self, action: &str) -> bool {
        self.act.iter().any(|a| a == action)
    }
}

/// Decoded claims of a token's payload segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Account SID (`sub`), if the claim holds a string or number.
    pub sub: Option<String>,
    /// Signing key SID (`iss`), if the claim holds a string or number.
    pub iss: Option<String>,
    /// Expiration instant (`exp`).
    pub exp: DateTime<Utc>,
    /// Grant entries in payload order. Unrecognized shapes are already dropped.
    pub grants: Vec<GrantEntry>,
}

/// Capabilities derived from a single matching grant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Address the holder can receive invites at.
    pub address: String,
    /// Whether the holder can create conversations and invite others.
    pub can_invite: bool,
    /// Whether the holder can listen for incoming invites.
    pub can_listen: bool,
}

/// Pluggable grant interpretation.
///
/// Implementations decide whether a grant entry is meaningful and, if so,
/// which capabilities it carries. The default is `SipGrantMatcher`; a
/// TOML-configured implementation lives in `sat-rules`.
pub trait GrantMatcher: Send + Sync {
    /// Interpret one grant. `None` means the grant is ignored.
    fn match_grant(&self, grant: &GrantEntry) -> Option<Capabilities>;
}
