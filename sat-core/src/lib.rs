//! # Scoped Authentication Token Core
//!
//! Parsing and capability derivation for scoped authentication tokens (SATs),
//! the JWTs that let a real-time communication client register an address and
//! place or receive invites.
//!
//! This crate provides:
//! - Payload decoding with structural validation (`decode`)
//! - `GrantMatcher` trait for pluggable grant interpretation, with the
//!   default `sip:` matcher (`grants`)
//! - `CapabilityToken`, the immutable parsed view of a token (`token`)
//!
//! Token signatures are not verified here.

pub mod decode;
pub mod error;
pub mod grants;
pub mod token;
pub mod types;

pub use decode::decode_payload;
pub use error::TokenError;
pub use grants::{derive_capabilities, resource_address, SipGrantMatcher};
pub use token::{CapabilityToken, TokenInput};
pub use types::{Capabilities, GrantEntry, GrantMatcher, Payload};
