//! The parsed, immutable capability token.

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::decode::decode_payload;
use crate::error::TokenError;
use crate::grants::{derive_capabilities, SipGrantMatcher};
use crate::types::{Capabilities, GrantMatcher};

/// A parsed scoped authentication token.
///
/// Wraps the raw JWT together with the account and signing-key SIDs, the
/// address the holder can receive invites at, and its `invite`/`listen`
/// permissions. Fields are fixed at construction; clones share the same
/// allocation, so a token can be handed to any number of readers.
///
/// The signature segment is **not** verified. Callers must obtain the raw
/// token over a channel they already trust.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityToken {
    inner: Arc<TokenFields>,
}

#[derive(Debug, PartialEq, Eq)]
struct TokenFields {
    account_sid: Option<String>,
    signing_key_sid: Option<String>,
    address: Option<String>,
    can_invite: bool,
    can_listen: bool,
    expires: DateTime<Utc>,
    jwt: String,
}

/// Input accepted by `CapabilityToken::new`: a raw token string or an
/// already-parsed token.
#[derive(Debug, Clone)]
pub enum TokenInput {
    Raw(String),
    Parsed(CapabilityToken),
}

impl From<&str> for TokenInput {
    fn from(s: &str) -> Self {
        TokenInput::Raw(s.to_string())
    }
}

impl From<String> for TokenInput {
    fn from(s: String) -> Self {
        TokenInput::Raw(s)
    }
}

impl From<CapabilityToken> for TokenInput {
    fn from(token: CapabilityToken) -> Self {
        TokenInput::Parsed(token)
    }
}

impl From<&CapabilityToken> for TokenInput {
    fn from(token: &CapabilityToken) -> Self {
        TokenInput::Parsed(token.clone())
    }
}

impl CapabilityToken {
    /// Wrap a raw token or pass an already-parsed token through unchanged.
    ///
    /// # Example
    /// ```rust,no_run
    /// use sat_core::CapabilityToken;
    ///
    /// let token = CapabilityToken::new("header.payload.signature")?;
    /// let same = CapabilityToken::new(&token)?;
    /// assert!(CapabilityToken::ptr_eq(&token, &same));
    /// # Ok::<(), sat_core::TokenError>(())
    /// ```
    pub fn new(input: impl Into<TokenInput>) -> Result<Self, TokenError> {
        match input.into() {
            TokenInput::Raw(raw) => Self::parse(&raw),
            TokenInput::Parsed(token) => Ok(token),
        }
    }

    /// Parse a raw token using the default `sip:` grant matcher.
    pub fn parse(raw: &str) -> Result<Self, TokenError> {
        Self::parse_with(raw, &SipGrantMatcher)
    }

    /// Parse a raw token, interpreting grants with the given matcher.
    ///
    /// When several grants match, the last one in payload order determines
    /// the address and permissions.
    pub fn parse_with<M>(raw: &str, matcher: &M) -> Result<Self, TokenError>
    where
        M: GrantMatcher + ?Sized,
    {
        let payload = decode_payload(raw)?;

        let (address, can_invite, can_listen) = match derive_capabilities(&payload.grants, matcher)
        {
            Some(Capabilities {
                address,
                can_invite,
                can_listen,
            }) => (Some(address), can_invite, can_listen),
            None => (None, false, false),
        };

        Ok(Self {
            inner: Arc::new(TokenFields {
                account_sid: payload.sub,
                signing_key_sid: payload.iss,
                address,
                can_invite,
                can_listen,
                expires: payload.exp,
                jwt: raw.to_string(),
            }),
        })
    }

    /// Account SID, absent when the payload carried no usable `sub`.
    pub fn account_sid(&self) -> Option<&str> {
        self.inner.account_sid.as_deref()
    }

    /// Signing key SID, absent when the payload carried no usable `iss`.
    pub fn signing_key_sid(&self) -> Option<&str> {
        self.inner.signing_key_sid.as_deref()
    }

    /// Address the holder can receive invites at, if any grant named one.
    pub fn address(&self) -> Option<&str> {
        self.inner.address.as_deref()
    }

    pub fn can_invite(&self) -> bool {
        self.inner.can_invite
    }

    pub fn can_listen(&self) -> bool {
        self.inner.can_listen
    }

    pub fn expires(&self) -> DateTime<Utc> {
        self.inner.expires
    }

    /// The unparsed token string.
    pub fn jwt(&self) -> &str {
        &self.inner.jwt
    }

    /// Check expiry against the current time. Recomputed on every call.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Check expiry against a given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.inner.expires
    }

    /// Return the token if it has not expired yet.
    ///
    /// Intended for callers that re-check liveness before each privileged
    /// operation.
    pub fn require_live(&self) -> Result<&Self, TokenError> {
        if self.is_expired() {
            tracing::debug!(
                account_sid = ?self.account_sid(),
                expires = %self.expires(),
                "rejecting expired token"
            );
            return Err(TokenError::Expired {
                expires: self.expires(),
            });
        }
        Ok(self)
    }

    /// Whether two handles refer to the same parsed instance.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl FromStr for CapabilityToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for CapabilityToken {
    type Error = TokenError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CapabilityToken {
    type Error = TokenError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

// `isExpired` is evaluated at serialization time.
impl Serialize for CapabilityToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CapabilityToken", 8)?;
        state.serialize_field("accountSid", &self.account_sid())?;
        state.serialize_field("address", &self.address())?;
        state.serialize_field("canInvite", &self.can_invite())?;
        state.serialize_field("canListen", &self.can_listen())?;
        state.serialize_field("expires", &self.expires())?;
        state.serialize_field("isExpired", &self.is_expired())?;
        state.serialize_field("jwt", self.jwt())?;
        state.serialize_field("signingKeySid", &self.signing_key_sid())?;
        state.end()
    }
}
