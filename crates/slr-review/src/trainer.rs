//! Training orchestration across the three screening agents
//!
//! One epoch walks every sample, feeds each agent its transitions, then
//! runs a single learning step per agent. The low update frequency is the
//! contract: callers rank up epochs rather than inner gradient loops.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use slr_core::{
    Embedder, HashingEmbedder, PaperRecord, Result, ReviewConfig, ABSTRACT_EMBED_DIM,
    FULLTEXT_EMBED_DIM,
};
use slr_rl::{make_abstract_policy, DqnAgent, ReviewPolicy, Transition};

use crate::rewards::{HumanFeedback, RewardSystem};

/// Search-refinement action-space size
pub const SEARCH_ACTIONS: usize = 5;
/// Abstract-triage action-space size (exclude / maybe / include)
pub const ABSTRACT_ACTIONS: usize = 3;
/// Full-text-triage action-space size (exclude / include)
pub const FULLTEXT_ACTIONS: usize = 2;

/// Checkpoint file names, keyed by agent role
pub const SEARCH_MODEL: &str = "search_agent.json";
pub const ABSTRACT_MODEL: &str = "title_abstract_filter_agent.json";
pub const FULLTEXT_MODEL: &str = "full_text_agent.json";

/// One labeled review sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSample {
    pub query: String,
    #[serde(default)]
    pub papers: Vec<PaperRecord>,
    #[serde(default)]
    pub search_action: usize,
    /// Per-paper abstract decisions; papers past the end default to include
    #[serde(default)]
    pub filter_decisions: Vec<usize>,
    /// Paper index -> expert label
    #[serde(default)]
    pub ground_truth_labels: HashMap<usize, usize>,
    #[serde(default)]
    pub human_feedback: Option<HumanFeedback>,
}

/// Per-stage mean rewards for one epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    pub epoch: usize,
    pub search_mean: f32,
    pub abstract_mean: f32,
    pub fulltext_mean: f32,
}

/// Outcome of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub epochs: Vec<EpochStats>,
}

/// Orchestrates training epochs across the search, abstract-filter, and
/// full-text agents.
pub struct ReviewTrainer {
    search_agent: DqnAgent,
    abstract_agent: Box<dyn ReviewPolicy>,
    fulltext_agent: DqnAgent,
    rewards: RewardSystem,
    fulltext_embedder: HashingEmbedder,
    config: ReviewConfig,
}

impl ReviewTrainer {
    pub fn new(config: ReviewConfig) -> Self {
        let rewards = RewardSystem::new(Box::new(HashingEmbedder::for_abstracts()));
        let search_agent = DqnAgent::new(ABSTRACT_EMBED_DIM, SEARCH_ACTIONS, &config.agent);
        let abstract_agent = make_abstract_policy(
            config.abstract_policy,
            ABSTRACT_EMBED_DIM,
            ABSTRACT_ACTIONS,
            &config.agent,
        );
        let fulltext_agent = DqnAgent::new(FULLTEXT_EMBED_DIM, FULLTEXT_ACTIONS, &config.agent);

        Self {
            search_agent,
            abstract_agent,
            fulltext_agent,
            rewards,
            fulltext_embedder: HashingEmbedder::for_full_text(),
            config,
        }
    }

    /// Restore all agents from the model directory. Missing checkpoints are
    /// cold starts, not errors.
    pub fn load_models(&mut self) -> Result<()> {
        let dir = self.config.model_dir.clone();
        self.search_agent.load_model(&dir.join(SEARCH_MODEL))?;
        self.abstract_agent.load_model(&dir.join(ABSTRACT_MODEL))?;
        self.fulltext_agent.load_model(&dir.join(FULLTEXT_MODEL))?;
        Ok(())
    }

    /// Run the configured number of epochs over `samples`
    pub fn train(&mut self, samples: &[TrainingSample]) -> TrainingReport {
        let started_at = Utc::now();
        let mut epochs = Vec::with_capacity(self.config.epochs);

        for epoch in 0..self.config.epochs {
            let mut search_rewards = Vec::new();
            let mut abstract_rewards = Vec::new();
            let mut fulltext_rewards = Vec::new();

            for sample in samples {
                let query_embedding = self.rewards.embed_text(&sample.query);

                // Search agent: one terminal transition per sample. The
                // next state is unused by the TD target (done = true).
                let search_reward = self.rewards.compute_search_reward(
                    &sample.papers,
                    &query_embedding,
                    sample.human_feedback,
                );
                self.search_agent.remember(
                    query_embedding.clone(),
                    sample.search_action,
                    search_reward,
                    query_embedding.clone(),
                    true,
                );
                search_rewards.push(search_reward);

                let cap = self.config.max_papers_per_sample;
                for (index, paper) in sample.papers.iter().take(cap).enumerate() {
                    let citations = paper.citation_count.unwrap_or(0);

                    // Abstract filter: labeled decision and optional truth
                    let embedding = self.rewards.embed_text(&paper.summary);
                    let decision = sample.filter_decisions.get(index).copied().unwrap_or(1);
                    let ground_truth = sample.ground_truth_labels.get(&index).copied();
                    let reward = self.rewards.compute_filter_reward(
                        &paper.summary,
                        citations,
                        decision,
                        ground_truth,
                    );
                    self.abstract_agent.remember(Transition::new(
                        embedding.clone(),
                        decision,
                        reward,
                        embedding,
                        true,
                    ));
                    abstract_rewards.push(reward);

                    // Full-text triage: the agent's own exploratory decision
                    let fulltext_state = self.fulltext_embedder.embed(&paper.summary);
                    let fulltext_decision = self.fulltext_agent.act(&fulltext_state, true);
                    let fulltext_reward = self.rewards.compute_filter_reward(
                        &paper.summary,
                        citations,
                        fulltext_decision,
                        None,
                    );
                    self.fulltext_agent.remember(
                        fulltext_state.clone(),
                        fulltext_decision,
                        fulltext_reward,
                        fulltext_state,
                        true,
                    );
                    fulltext_rewards.push(fulltext_reward);
                }
            }

            // One gradient step per agent per epoch
            self.search_agent.learn();
            self.abstract_agent.train();
            self.fulltext_agent.learn();

            let stats = EpochStats {
                epoch,
                search_mean: mean(&search_rewards),
                abstract_mean: mean(&abstract_rewards),
                fulltext_mean: mean(&fulltext_rewards),
            };
            info!(
                epoch,
                search = format!("{:.3}", stats.search_mean),
                abstract_filter = format!("{:.3}", stats.abstract_mean),
                full_text = format!("{:.3}", stats.fulltext_mean),
                "epoch complete"
            );
            epochs.push(stats);
        }

        TrainingReport {
            started_at,
            finished_at: Utc::now(),
            epochs,
        }
    }

    /// Persist all three agents' weights. Falls back to the system temp
    /// directory when the configured model directory is not writable;
    /// returns the directory actually used.
    pub fn save_models(&self) -> Result<PathBuf> {
        let primary = self.config.model_dir.clone();
        match self.save_into(&primary) {
            Ok(()) => Ok(primary),
            Err(err) => {
                let fallback = std::env::temp_dir().join("slr-models");
                warn!(
                    dir = %primary.display(),
                    error = %err,
                    fallback = %fallback.display(),
                    "model directory not writable, using fallback"
                );
                self.save_into(&fallback)?;
                Ok(fallback)
            }
        }
    }

    fn save_into(&self, dir: &Path) -> Result<()> {
        self.search_agent.save_model(&dir.join(SEARCH_MODEL))?;
        self.abstract_agent.save_model(&dir.join(ABSTRACT_MODEL))?;
        self.fulltext_agent.save_model(&dir.join(FULLTEXT_MODEL))?;
        Ok(())
    }

    pub fn search_agent(&self) -> &DqnAgent {
        &self.search_agent
    }

    pub fn fulltext_agent(&self) -> &DqnAgent {
        &self.fulltext_agent
    }
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}
