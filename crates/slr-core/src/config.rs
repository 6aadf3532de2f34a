//! Configuration for training and screening runs

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SlrError};

/// Which policy architecture backs the abstract-filter role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// Value-learning agent (DQN)
    Value,
    /// Actor-critic policy-gradient agent
    ActorCritic,
}

impl FromStr for PolicyKind {
    type Err = SlrError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "value" | "dqn" => Ok(PolicyKind::Value),
            "actor-critic" | "ppo" => Ok(PolicyKind::ActorCritic),
            other => Err(SlrError::Config(format!("unknown policy kind: {other}"))),
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyKind::Value => write!(f, "value"),
            PolicyKind::ActorCritic => write!(f, "actor-critic"),
        }
    }
}

/// Hyperparameters shared by all trainable agents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub learning_rate: f32,
    pub gamma: f32,
    pub batch_size: usize,
    pub replay_capacity: usize,
    pub epsilon_start: f64,
    pub epsilon_decay: f64,
    pub epsilon_min: f64,
    /// Hard-sync the target network every this many learning steps
    pub target_sync_interval: u64,
    pub hidden_dims: Vec<usize>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-3,
            gamma: 0.99,
            batch_size: 64,
            replay_capacity: 10_000,
            epsilon_start: 1.0,
            epsilon_decay: 0.995,
            epsilon_min: 0.1,
            target_sync_interval: 10,
            hidden_dims: vec![128, 64],
        }
    }
}

/// Top-level configuration for the review pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    pub model_dir: PathBuf,
    pub epochs: usize,
    /// Per-sample cap on papers fed to the filter agents during training
    pub max_papers_per_sample: usize,
    /// How many ranked screening records to keep
    pub top_results: usize,
    pub abstract_policy: PolicyKind,
    pub agent: AgentConfig,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            epochs: 50,
            max_papers_per_sample: 5,
            top_results: 10,
            abstract_policy: PolicyKind::Value,
            agent: AgentConfig::default(),
        }
    }
}

impl ReviewConfig {
    /// Load from a TOML file, or return defaults when `path` does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| SlrError::Config(e.to_string()))
    }
}

fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("slr/models"))
        .unwrap_or_else(|| PathBuf::from("models"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_training_contract() {
        let config = AgentConfig::default();
        assert_eq!(config.batch_size, 64);
        assert_eq!(config.replay_capacity, 10_000);
        assert_eq!(config.epsilon_start, 1.0);
        assert_eq!(config.epsilon_decay, 0.995);
        assert_eq!(config.epsilon_min, 0.1);
        assert!((config.gamma - 0.99).abs() < 1e-6);
    }

    #[test]
    fn test_policy_kind_from_str() {
        assert_eq!("value".parse::<PolicyKind>().unwrap(), PolicyKind::Value);
        assert_eq!("dqn".parse::<PolicyKind>().unwrap(), PolicyKind::Value);
        assert_eq!(
            "actor-critic".parse::<PolicyKind>().unwrap(),
            PolicyKind::ActorCritic
        );
        assert!("tabular".parse::<PolicyKind>().is_err());
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let config = ReviewConfig::load(Path::new("/nonexistent/slr.toml")).unwrap();
        assert_eq!(config.epochs, 50);
        assert_eq!(config.max_papers_per_sample, 5);
        assert_eq!(config.abstract_policy, PolicyKind::Value);
    }

    #[test]
    fn test_load_toml_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slr.toml");
        let contents = r#"
            model_dir = "/tmp/slr-models"
            epochs = 5
            max_papers_per_sample = 3
            top_results = 20
            abstract_policy = "actor-critic"

            [agent]
            learning_rate = 0.0005
            gamma = 0.95
            batch_size = 32
            replay_capacity = 1000
            epsilon_start = 0.9
            epsilon_decay = 0.99
            epsilon_min = 0.05
            target_sync_interval = 5
            hidden_dims = [64, 32]
        "#;
        std::fs::write(&path, contents).unwrap();

        let config = ReviewConfig::load(&path).unwrap();
        assert_eq!(config.epochs, 5);
        assert_eq!(config.abstract_policy, PolicyKind::ActorCritic);
        assert_eq!(config.agent.batch_size, 32);
        assert_eq!(config.agent.hidden_dims, vec![64, 32]);
    }
}
