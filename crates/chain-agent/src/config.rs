//! Agent configuration, loaded from YAML.

use std::path::{Path, PathBuf};

use chain_core::PaceTable;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config from {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Tunables for one agent. Defaults reproduce the tuned competition values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// RNG seed, mixed with the team id on the first tick.
    pub seed: u64,

    /// Boost spend below which an uncontested move is boosted.
    #[serde(default = "default_boost_spend_threshold")]
    pub boost_spend_threshold: u32,

    /// Boost tier for uncontested moves while under the spend threshold.
    #[serde(default = "default_uncontested_boost")]
    pub uncontested_boost: u8,

    /// Boost tier used to out-push a competitor that has spent more.
    #[serde(default = "default_contested_boost")]
    pub contested_boost: u8,

    /// Commit ceiling for pace tiers that do not set their own.
    #[serde(default = "default_commit_ceiling")]
    pub default_commit_ceiling: i32,

    /// Per-pace thresholds.
    pub pace: PaceTable,
}

fn default_boost_spend_threshold() -> u32 {
    20
}
fn default_uncontested_boost() -> u8 {
    2
}
fn default_contested_boost() -> u8 {
    3
}
fn default_commit_ceiling() -> i32 {
    20
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            boost_spend_threshold: default_boost_spend_threshold(),
            uncontested_boost: default_uncontested_boost(),
            contested_boost: default_contested_boost(),
            default_commit_ceiling: default_commit_ceiling(),
            pace: PaceTable::default(),
        }
    }
}

impl AgentConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chain_core::Pace;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: AgentConfig = serde_yaml::from_str("seed: 9\ncontested_boost: 2\n").unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.contested_boost, 2);
        assert_eq!(config.boost_spend_threshold, 20);
        assert_eq!(config.pace, PaceTable::default());
    }

    #[test]
    fn pace_overrides_parse() {
        let yaml = r#"
pace:
  bounds: [50, 100, 150, 300]
  mini: { fortify_threshold: 6, commit_ceiling: 8, stage_fraction: 0.1 }
"#;
        let config: AgentConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.pace.classify(60), Pace::Short);
        assert_eq!(config.pace.config(Pace::Mini).fortify_threshold, 6);
        assert_eq!(config.pace.config(Pace::Medium).commit_ceiling, Some(18));
    }

    #[test]
    fn load_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.yaml");
        std::fs::write(&path, "seed: [not a number").unwrap();

        let err = AgentConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
        assert!(err.to_string().contains("agent.yaml"));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AgentConfig::load_or_default(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, AgentConfig::default());
    }
}
