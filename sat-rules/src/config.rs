//! TOML configuration parsing for grant rules.

use serde::Deserialize;
use thiserror::Error;

/// Errors from grant rules configuration parsing.
#[derive(Error, Debug)]
pub enum RulesConfigError {
    #[error("failed to read rules file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse rules TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid rules: {0}")]
    Invalid(String),
}

/// Top-level grant rules configuration.
///
/// Every field is optional; an empty document describes the standard
/// `sip:` matcher.
#[derive(Debug, Clone, Deserialize)]
pub struct GrantRulesConfig {
    /// Resource scheme to match, without the trailing colon.
    #[serde(default = "default_scheme")]
    pub scheme: String,

    /// Action names that grant the invite capability.
    #[serde(default = "default_invite_actions")]
    pub invite_actions: Vec<String>,

    /// Action names that grant the listen capability.
    #[serde(default = "default_listen_actions")]
    pub listen_actions: Vec<String>,
}

fn default_scheme() -> String {
    "sip".to_string()
}

fn default_invite_actions() -> Vec<String> {
    vec!["invite".to_string()]
}

fn default_listen_actions() -> Vec<String> {
    vec!["listen".to_string()]
}

impl Default for GrantRulesConfig {
    fn default() -> Self {
        Self {
            scheme: default_scheme(),
            invite_actions: default_invite_actions(),
            listen_actions: default_listen_actions(),
        }
    }
}

impl GrantRulesConfig {
    /// Load rules from a TOML file path.
    pub fn from_file(path: &std::path::Path) -> Result<Self, RulesConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), scheme = %config.scheme, "loaded grant rules");
        Ok(config)
    }

    /// Parse rules from a TOML string.
    pub fn parse(content: &str) -> Result<Self, RulesConfigError> {
        let config: GrantRulesConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), RulesConfigError> {
        if self.scheme.is_empty() {
            return Err(RulesConfigError::Invalid("scheme must not be empty".into()));
        }
        if self.scheme.contains(':') {
            return Err(RulesConfigError::Invalid(format!(
                "scheme '{}' must not contain ':'",
                self.scheme
            )));
        }
        Ok(())
    }
}
