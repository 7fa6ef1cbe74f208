//! # Scoped Authentication Token Rules
//!
//! Configurable grant matching for scoped authentication tokens.
//!
//! Provides TOML-based configuration for the resource scheme and the action
//! names that map to the invite and listen capabilities.

mod config;
mod rules;

pub use config::{GrantRulesConfig, RulesConfigError};
pub use rules::GrantRules;
