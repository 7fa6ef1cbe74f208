//! # Scoped Authentication Tokens
//!
//! Convenience crate that re-exports the token core together with the
//! TOML-configured grant rules backend.
//!
//! For the core parser alone, depend on `sat-core` directly.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sat::{CapabilityToken, GrantRules};
//!
//! # let jwt = String::new();
//! // Parse with the default `sip:` grant matcher
//! let token = CapabilityToken::parse(&jwt).expect("Failed to parse token");
//!
//! if let Some(address) = token.address() {
//!     let account = token.account_sid().unwrap_or("unknown account");
//!     println!("{account} may receive invites at {address}");
//! }
//!
//! // Re-check liveness before each privileged operation
//! if token.require_live().is_ok() && token.can_invite() {
//!     // place the call
//! }
//!
//! // Parse with configured grant rules
//! let rules = GrantRules::from_toml(r#"
//!     scheme = "sip"
//!     invite_actions = ["invite", "dial"]
//! "#).expect("Failed to parse rules");
//! let token = CapabilityToken::parse_with(&jwt, &rules).expect("Failed to parse token");
//! # let _ = token;
//! ```

// Re-export everything from the core crate
pub use sat_core::*;

// Re-export the configured rules backend
pub use sat_rules::{GrantRules, GrantRulesConfig, RulesConfigError};
