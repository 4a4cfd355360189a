//! Governance configuration, loaded from TOML.
//!
//! Every field has a production default; a config file only needs the
//! values it wants to change.

use std::path::Path;

use serde::{Deserialize, Serialize};

use concord_contracts::error::{GovResult, GovernanceError};

/// Tuning values for the governance core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    /// Per-round validator deadline, in seconds.
    pub validator_timeout_secs: u64,
    /// Hours before an unresolved escalation is flagged stale.
    /// Staleness never resolves anything — fail-closed.
    pub escalation_stale_hours: i64,
    /// Absolute signal magnitude bound; see the trust engine.
    pub signal_safety_band: i64,
    /// Days without any signal before decay starts.
    pub decay_grace_days: i64,
    /// Points lost per day once decay starts.
    pub decay_points_per_day: u32,
    /// Maximum precedents handed to each validator.
    pub precedent_k: usize,
    /// Chain-instance signing key for audit record signatures.
    pub chain_signing_key: String,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            validator_timeout_secs: 30,
            escalation_stale_hours: 24,
            signal_safety_band: 100,
            decay_grace_days: 7,
            decay_points_per_day: 1,
            precedent_k: 5,
            chain_signing_key: "concord-dev-chain-key".to_string(),
        }
    }
}

impl GovernanceConfig {
    /// Parse `s` as TOML over the defaults.
    pub fn from_toml_str(s: &str) -> GovResult<Self> {
        toml::from_str(s).map_err(|e| GovernanceError::ConfigError {
            reason: format!("failed to parse governance config TOML: {}", e),
        })
    }

    /// Read and parse the file at `path`.
    pub fn from_file(path: &Path) -> GovResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| GovernanceError::ConfigError {
            reason: format!(
                "failed to read governance config '{}': {}",
                path.display(),
                e
            ),
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::GovernanceConfig;

    #[test]
    fn defaults_match_the_fixed_policy() {
        let config = GovernanceConfig::default();
        assert_eq!(config.validator_timeout_secs, 30);
        assert_eq!(config.escalation_stale_hours, 24);
        assert_eq!(config.decay_grace_days, 7);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config =
            GovernanceConfig::from_toml_str("validator_timeout_secs = 5\nprecedent_k = 3").unwrap();
        assert_eq!(config.validator_timeout_secs, 5);
        assert_eq!(config.precedent_k, 3);
        // Untouched fields keep their defaults.
        assert_eq!(config.signal_safety_band, 100);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        assert!(GovernanceConfig::from_toml_str("validator_timeout_secs = \"soon\"").is_err());
    }
}
