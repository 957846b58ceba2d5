//! Engine configuration with TOML file support, and the immutable per-run
//! snapshot derived from it.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use canopy_ledger::RewardRouting;
use canopy_ranks::{RankRule, RankRuleTable};
use canopy_types::CompParams;

use crate::EngineError;

/// Configuration for the canopy engine.
///
/// Can be loaded from a TOML file via [`EngineConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Data directory for LMDB storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Name under which distribution runs are logged and locked.
    #[serde(default = "default_job_name")]
    pub job_name: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Compensation parameters.
    #[serde(default)]
    pub params: CompParams,

    /// Rank rule table override, easiest tier first. Defaults to the
    /// production B0..B9 table when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank_rules: Option<Vec<RankRule>>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./canopy_data")
}

fn default_job_name() -> String {
    "daily-distribution".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &std::path::Path) -> Result<Self, EngineError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
        toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("EngineConfig is always serializable to TOML")
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            job_name: default_job_name(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            params: CompParams::default(),
            rank_rules: None,
        }
    }
}

/// Immutable snapshot of everything a distribution run reads: parameters,
/// the validated rank table, and the currency routing.
///
/// Captured once at the start of a run so a configuration change mid-run
/// can never produce inconsistent per-level treatment.
#[derive(Clone)]
pub struct RunSnapshot {
    pub params: CompParams,
    pub table: RankRuleTable,
    pub routing: RewardRouting,
}

impl RunSnapshot {
    pub fn capture(config: &EngineConfig) -> Result<Self, EngineError> {
        let table = match &config.rank_rules {
            Some(rules) => RankRuleTable::new(rules.clone())?,
            None => RankRuleTable::default_table(),
        };
        Ok(Self {
            params: config.params.clone(),
            routing: RewardRouting::from_params(&config.params),
            table,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = EngineConfig::default();
        let toml_str = config.to_toml_string();
        let parsed = EngineConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.job_name, config.job_name);
        assert_eq!(parsed.params.max_tree_depth, config.params.max_tree_depth);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.job_name, "daily-distribution");
        assert_eq!(config.log_level, "info");
        assert!(config.params.referral_bonuses_enabled);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            job_name = "nightly"

            [params]
            staking_paused = true
        "#;
        let config = EngineConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.job_name, "nightly");
        assert!(config.params.staking_paused);
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = EngineConfig::from_toml_file(std::path::Path::new("/nonexistent/canopy.toml"));
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn snapshot_validates_rank_rule_override() {
        let mut config = EngineConfig::default();
        assert!(RunSnapshot::capture(&config).is_ok());

        config.rank_rules = Some(vec![]); // empty table is invalid
        assert!(RunSnapshot::capture(&config).is_err());
    }
}
