//! Configured grant matcher.

use sat_core::{resource_address, Capabilities, GrantEntry, GrantMatcher};

use crate::config::{GrantRulesConfig, RulesConfigError};

/// Grant matcher driven by a `GrantRulesConfig`.
///
/// A grant matches when its resource is `<scheme>:<address>@...`. The invite
/// and listen capabilities are set when the grant lists any of the configured
/// action names. With the default configuration this behaves exactly like
/// `sat_core::SipGrantMatcher`.
#[derive(Debug, Clone, Default)]
pub struct GrantRules {
    config: GrantRulesConfig,
}

impl GrantRules {
    /// Create rules from a parsed configuration.
    pub fn from_config(config: GrantRulesConfig) -> Self {
        Self { config }
    }

    /// Create rules from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, RulesConfigError> {
        let config = GrantRulesConfig::parse(content)?;
        Ok(Self::from_config(config))
    }

    /// Create rules from a TOML file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, RulesConfigError> {
        let config = GrantRulesConfig::from_file(path)?;
        Ok(Self::from_config(config))
    }

    pub fn config(&self) -> &GrantRulesConfig {
        &self.config
    }

    fn allows_any(grant: &GrantEntry, actions: &[String]) -> bool {
        actions.iter().any(|action| grant.allows(action))
    }
}

impl GrantMatcher for GrantRules {
    fn match_grant(&self, grant: &GrantEntry) -> Option<Capabilities> {
        let address = resource_address(&grant.res, &self.config.scheme)?;
        Some(Capabilities {
            address: address.to_string(),
            can_invite: Self::allows_any(grant, &self.config.invite_actions),
            can_listen: Self::allows_any(grant, &self.config.listen_actions),
        })
    }
}
