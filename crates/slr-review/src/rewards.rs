//! Reward computation for search, filtering, and PRISMA compliance
//!
//! The scoring functions are pure except for one piece of rolling state:
//! the bounded human-feedback history used as a sliding window for reward
//! shaping. Empty inputs yield sentinel values, never errors.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use slr_core::{cosine_similarity, Embedder, PaperRecord, PrismaChecklist};

/// Bound on the human-feedback history
pub const FEEDBACK_CAPACITY: usize = 1_000;

/// Sliding-window size for feedback shaping
pub const FEEDBACK_WINDOW: usize = 10;

const METHODOLOGY_KEYWORDS: [&str; 4] = ["method", "approach", "algorithm", "framework"];
const RESULTS_KEYWORDS: [&str; 4] = ["result", "performance", "evaluation", "experiment"];

/// One unit of human feedback on retrieved results, both fields in [0, 1]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HumanFeedback {
    pub relevance: f32,
    pub quality: f32,
}

/// Scores agent decisions across all review stages.
///
/// Holds the embedder used to score paper summaries against queries and
/// the rolling feedback history.
pub struct RewardSystem {
    diversity_bonus: f32,
    human_feedback_weight: f32,
    feedback_history: VecDeque<HumanFeedback>,
    embedder: Box<dyn Embedder>,
}

impl RewardSystem {
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self {
            diversity_bonus: 0.1,
            human_feedback_weight: 0.3,
            feedback_history: VecDeque::with_capacity(FEEDBACK_CAPACITY),
            embedder,
        }
    }

    /// Embed text with the system's embedder
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        self.embedder.embed(text)
    }

    /// Reward for a search-refinement outcome, in [-1, 1].
    ///
    /// Exactly -1.0 for an empty result set. Otherwise mean cosine
    /// relevance of the summaries to the query, plus a diversity bonus,
    /// plus weighted human feedback when supplied.
    pub fn compute_search_reward(
        &mut self,
        papers: &[PaperRecord],
        query_embedding: &[f32],
        human_feedback: Option<HumanFeedback>,
    ) -> f32 {
        if papers.is_empty() {
            return -1.0;
        }

        let embeddings: Vec<Vec<f32>> = papers
            .iter()
            .map(|paper| self.embedder.embed(&paper.summary))
            .collect();

        let avg_relevance = embeddings
            .iter()
            .map(|embedding| cosine_similarity(query_embedding, embedding))
            .sum::<f32>()
            / papers.len() as f32;

        let diversity = diversity_score(&embeddings);

        let feedback_score = match human_feedback {
            Some(feedback) => self.integrate_human_feedback(feedback),
            None => 0.0,
        };

        let reward = avg_relevance
            + self.diversity_bonus * diversity
            + self.human_feedback_weight * feedback_score;
        reward.clamp(-1.0, 1.0)
    }

    /// How spread out a result set is: 1 minus the mean pairwise cosine
    /// similarity, floored at 0. Fewer than 2 papers score 0.
    pub fn calculate_diversity(&self, papers: &[PaperRecord]) -> f32 {
        let embeddings: Vec<Vec<f32>> = papers
            .iter()
            .map(|paper| self.embedder.embed(&paper.summary))
            .collect();
        diversity_score(&embeddings)
    }

    /// Fold new feedback into the rolling history and return the shaped
    /// score in [-1, 1].
    ///
    /// The window is the last `FEEDBACK_WINDOW` entries including the new
    /// one: `0.6 * mean(relevance) + 0.4 * mean(quality)`, rescaled from
    /// [0, 1] to [-1, 1].
    pub fn integrate_human_feedback(&mut self, feedback: HumanFeedback) -> f32 {
        if self.feedback_history.len() >= FEEDBACK_CAPACITY {
            self.feedback_history.pop_front();
        }
        self.feedback_history.push_back(feedback);

        let window: Vec<&HumanFeedback> = self
            .feedback_history
            .iter()
            .rev()
            .take(FEEDBACK_WINDOW)
            .collect();

        let count = window.len() as f32;
        let relevance = window.iter().map(|f| f.relevance).sum::<f32>() / count;
        let quality = window.iter().map(|f| f.quality).sum::<f32>() / count;

        let weighted = 0.6 * relevance + 0.4 * quality;
        (weighted - 0.5) * 2.0
    }

    /// Number of feedback entries currently held
    pub fn feedback_len(&self) -> usize {
        self.feedback_history.len()
    }

    /// Reward for an include/exclude decision at a filter stage, in [-1, 1].
    ///
    /// Including (decision 1) pays off when the abstract shows both
    /// methodology and results language and the paper is cited; excluding
    /// (decision 0) pays off when either is missing. Matching a supplied
    /// ground-truth label adds 0.5, contradicting it costs 0.3.
    pub fn compute_filter_reward(
        &self,
        abstract_text: &str,
        citation_count: u32,
        decision: usize,
        ground_truth: Option<usize>,
    ) -> f32 {
        let text = abstract_text.to_lowercase();
        let has_methodology = METHODOLOGY_KEYWORDS.iter().any(|kw| text.contains(kw));
        let has_results = RESULTS_KEYWORDS.iter().any(|kw| text.contains(kw));

        let mut reward: f32 = 0.0;
        if decision == 1 {
            reward = 0.5;
            if has_methodology && has_results {
                reward += 0.3;
            }
            if citation_count > 10 {
                reward += 0.2;
            }
        } else if decision == 0 {
            reward = 0.1;
            if !has_methodology || !has_results {
                reward += 0.2;
            }
        }

        if let Some(truth) = ground_truth {
            if decision == truth {
                reward += 0.5;
            } else {
                reward -= 0.3;
            }
        }

        reward.clamp(-1.0, 1.0)
    }

    /// PRISMA compliance reward in [0, 1]: the checklist mean with a 0.2
    /// bonus above 0.8.
    pub fn compute_prisma_reward(&self, checklist: &PrismaChecklist) -> f32 {
        let mut score = checklist.mean();
        if score > 0.8 {
            score += 0.2;
        }
        score.clamp(0.0, 1.0)
    }
}

fn diversity_score(embeddings: &[Vec<f32>]) -> f32 {
    if embeddings.len() < 2 {
        return 0.0;
    }

    let mut similarities = Vec::new();
    for i in 0..embeddings.len() {
        for j in (i + 1)..embeddings.len() {
            similarities.push(cosine_similarity(&embeddings[i], &embeddings[j]));
        }
    }

    let avg_similarity = similarities.iter().sum::<f32>() / similarities.len() as f32;
    (1.0 - avg_similarity).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slr_core::HashingEmbedder;

    fn reward_system() -> RewardSystem {
        RewardSystem::new(Box::new(HashingEmbedder::for_abstracts()))
    }

    fn paper(summary: &str) -> PaperRecord {
        PaperRecord::new("Title", summary, 2024, "https://example.org/abs/1")
    }

    #[test]
    fn test_search_reward_empty_is_minus_one() {
        let mut rewards = reward_system();
        let query = rewards.embed_text("anything");
        assert_eq!(rewards.compute_search_reward(&[], &query, None), -1.0);
    }

    #[test]
    fn test_search_reward_identical_papers_saturates() {
        let mut rewards = reward_system();
        let text = "deep learning for healthcare";
        let query = rewards.embed_text(text);
        let papers = vec![paper(text), paper(text), paper(text)];

        // Relevance 1.0, diversity 0 for identical summaries
        let reward = rewards.compute_search_reward(&papers, &query, None);
        assert!((reward - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_search_reward_in_range() {
        let mut rewards = reward_system();
        let query = rewards.embed_text("graph neural networks");
        let papers = vec![
            paper("graph neural networks for molecules"),
            paper("transformer language models"),
            paper("bayesian optimization methods"),
        ];

        let reward = rewards.compute_search_reward(&papers, &query, None);
        assert!((-1.0..=1.0).contains(&reward));
    }

    #[test]
    fn test_diversity_zero_for_single_paper() {
        let rewards = reward_system();
        assert_eq!(rewards.calculate_diversity(&[paper("only one")]), 0.0);
        assert_eq!(rewards.calculate_diversity(&[]), 0.0);
    }

    #[test]
    fn test_feedback_window_math() {
        let mut rewards = reward_system();
        let score = rewards.integrate_human_feedback(HumanFeedback {
            relevance: 0.7,
            quality: 0.6,
        });
        // 0.6 * 0.7 + 0.4 * 0.6 = 0.66 -> (0.66 - 0.5) * 2 = 0.32
        assert!((score - 0.32).abs() < 1e-6);
    }

    #[test]
    fn test_feedback_history_is_bounded() {
        let mut rewards = reward_system();
        for _ in 0..(FEEDBACK_CAPACITY + 1) {
            rewards.integrate_human_feedback(HumanFeedback {
                relevance: 0.5,
                quality: 0.5,
            });
        }
        assert_eq!(rewards.feedback_len(), FEEDBACK_CAPACITY);
    }

    #[test]
    fn test_feedback_uses_last_ten_entries() {
        let mut rewards = reward_system();
        // Fill beyond the window with low feedback
        for _ in 0..20 {
            rewards.integrate_human_feedback(HumanFeedback {
                relevance: 0.0,
                quality: 0.0,
            });
        }
        // Nine perfect entries, then the tenth fills the window
        for _ in 0..9 {
            rewards.integrate_human_feedback(HumanFeedback {
                relevance: 1.0,
                quality: 1.0,
            });
        }
        let score = rewards.integrate_human_feedback(HumanFeedback {
            relevance: 1.0,
            quality: 1.0,
        });
        // Window now holds only perfect entries: (1.0 - 0.5) * 2 = 1.0
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_filter_reward_exact_include_scenario() {
        let rewards = reward_system();
        let abstract_text = "A novel method with strong experimental results.";

        // 0.5 + 0.3 (methodology+results) + 0.2 (citations) + 0.5 (truth) = 1.5 -> 1.0
        let matched = rewards.compute_filter_reward(abstract_text, 15, 1, Some(1));
        assert_eq!(matched, 1.0);

        // 0.5 + 0.3 + 0.2 - 0.3 = 0.7
        let mismatched = rewards.compute_filter_reward(abstract_text, 15, 1, Some(0));
        assert!((mismatched - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_filter_reward_truth_ordering() {
        let rewards = reward_system();
        let text = "An approach evaluated on benchmarks.";
        let correct = rewards.compute_filter_reward(text, 0, 1, Some(1));
        let incorrect = rewards.compute_filter_reward(text, 0, 1, Some(0));
        assert!(correct > incorrect);
    }

    #[test]
    fn test_filter_reward_exclude_branch() {
        let rewards = reward_system();
        // No methodology or results language: exclusion earns the bonus
        let vague = rewards.compute_filter_reward("A short note on a topic.", 0, 0, None);
        assert!((vague - 0.3).abs() < 1e-6);

        // Both present: plain exclusion base only
        let solid = rewards.compute_filter_reward("method and result discussed", 0, 0, None);
        assert!((solid - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_prisma_reward_range_and_bonus() {
        let rewards = reward_system();

        let empty = PrismaChecklist::default();
        assert_eq!(rewards.compute_prisma_reward(&empty), 0.0);

        let mut strong = PrismaChecklist::default();
        for name in slr_core::CHECKLIST_ITEMS {
            strong.set(name, 0.9);
        }
        // Mean 0.9 > 0.8, bonus applies, clipped to 1.0
        assert_eq!(rewards.compute_prisma_reward(&strong), 1.0);

        let mut middling = PrismaChecklist::default();
        for name in slr_core::CHECKLIST_ITEMS {
            middling.set(name, 0.5);
        }
        assert!((rewards.compute_prisma_reward(&middling) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_prisma_reward_monotone_in_each_item() {
        let rewards = reward_system();
        for name in slr_core::CHECKLIST_ITEMS {
            let mut low = PrismaChecklist::default();
            let mut high = PrismaChecklist::default();
            for item in slr_core::CHECKLIST_ITEMS {
                low.set(item, 0.4);
                high.set(item, 0.4);
            }
            low.set(name, 0.1);
            high.set(name, 0.9);

            assert!(
                rewards.compute_prisma_reward(&high) >= rewards.compute_prisma_reward(&low),
                "not monotone in {name}"
            );
        }
    }
}
