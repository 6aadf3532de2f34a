//! PRISMA checker: cooperative scoring across the review stages

use std::collections::HashMap;

use slr_core::{PaperRecord, PrismaChecklist};

use crate::rewards::RewardSystem;

/// Aggregates per-agent rewards into one cooperative score and exposes the
/// stage-specific reward evaluations.
pub struct PrismaChecker {
    rewards: RewardSystem,
}

impl PrismaChecker {
    pub fn new(rewards: RewardSystem) -> Self {
        Self { rewards }
    }

    pub fn rewards(&self) -> &RewardSystem {
        &self.rewards
    }

    pub fn rewards_mut(&mut self) -> &mut RewardSystem {
        &mut self.rewards
    }

    /// Arithmetic mean of the per-agent rewards; 0.0 for an empty map
    pub fn compute_global_reward(&self, agent_rewards: &HashMap<String, f32>) -> f32 {
        if agent_rewards.is_empty() {
            return 0.0;
        }
        agent_rewards.values().sum::<f32>() / agent_rewards.len() as f32
    }

    /// Search-stage reward for a retrieved result set
    pub fn evaluate_search_reward(&mut self, papers: &[PaperRecord], query_embedding: &[f32]) -> f32 {
        self.rewards
            .compute_search_reward(papers, query_embedding, None)
    }

    /// Abstract-stage reward for a triage decision on `paper`
    pub fn evaluate_abstract_reward(&self, paper: &PaperRecord, decision: usize) -> f32 {
        self.rewards.compute_filter_reward(
            &paper.summary,
            paper.citation_count.unwrap_or(0),
            decision,
            None,
        )
    }

    /// Full-text-stage reward for a triage decision, scored on the
    /// extracted text (or the abstract when extraction fell back)
    pub fn evaluate_fulltext_reward(
        &self,
        paper: &PaperRecord,
        text: &str,
        decision: usize,
    ) -> f32 {
        self.rewards.compute_filter_reward(
            text,
            paper.citation_count.unwrap_or(0),
            decision,
            None,
        )
    }

    /// Checklist compliance score in [0, 1]
    pub fn evaluate_prisma_score(&self, checklist: &PrismaChecklist) -> f32 {
        self.rewards.compute_prisma_reward(checklist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slr_core::HashingEmbedder;

    fn checker() -> PrismaChecker {
        PrismaChecker::new(RewardSystem::new(Box::new(HashingEmbedder::for_abstracts())))
    }

    #[test]
    fn test_global_reward_is_arithmetic_mean() {
        let checker = checker();
        let mut agent_rewards = HashMap::new();
        agent_rewards.insert("search".to_string(), 0.8);
        agent_rewards.insert("title_abstract".to_string(), 0.9);
        agent_rewards.insert("full_text".to_string(), 0.7);

        let global = checker.compute_global_reward(&agent_rewards);
        assert!((global - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_global_reward_empty_map_is_zero() {
        assert_eq!(checker().compute_global_reward(&HashMap::new()), 0.0);
    }

    #[test]
    fn test_global_reward_single_agent() {
        let checker = checker();
        let mut agent_rewards = HashMap::new();
        agent_rewards.insert("search".to_string(), -0.4);
        assert!((checker.compute_global_reward(&agent_rewards) - (-0.4)).abs() < 1e-6);
    }

    #[test]
    fn test_stage_delegates_agree_with_reward_system() {
        let mut checker = checker();
        let paper = PaperRecord::new(
            "T",
            "A method with experimental results.",
            2024,
            "https://example.org/abs/9",
        )
        .with_citation_count(15);

        let direct =
            checker
                .rewards()
                .compute_filter_reward("A method with experimental results.", 15, 1, None);
        assert_eq!(checker.evaluate_abstract_reward(&paper, 1), direct);

        let query = checker.rewards().embed_text("methods");
        assert_eq!(checker.evaluate_search_reward(&[], &query), -1.0);
    }
}
