//! Inference-side screening pipeline
//!
//! Greedy (non-exploring) pass over already-fetched papers: the abstract
//! agent decides Exclude/Maybe/Include, the full-text agent scores the
//! extracted text, and both stage rewards merge into one ranked record per
//! paper, matched by `PaperId`.

use std::path::Path;

use chrono::Utc;
use tracing::debug;

use slr_core::{
    Embedder, FilterDecision, FullTextSource, HashingEmbedder, PaperRecord, Result, ReviewConfig,
    ScreeningRecord, ABSTRACT_EMBED_DIM, FULLTEXT_EMBED_DIM,
};
use slr_rl::{make_abstract_policy, DqnAgent, ReviewPolicy};

use crate::prisma::PrismaChecker;
use crate::rewards::RewardSystem;
use crate::trainer::{ABSTRACT_ACTIONS, ABSTRACT_MODEL, FULLTEXT_ACTIONS, FULLTEXT_MODEL};

/// The agent set behind one screening run (or one dashboard session)
pub struct ScreeningPipeline {
    abstract_agent: Box<dyn ReviewPolicy>,
    fulltext_agent: DqnAgent,
    checker: PrismaChecker,
    fulltext_embedder: HashingEmbedder,
}

impl ScreeningPipeline {
    pub fn new(config: &ReviewConfig) -> Self {
        let abstract_agent = make_abstract_policy(
            config.abstract_policy,
            ABSTRACT_EMBED_DIM,
            ABSTRACT_ACTIONS,
            &config.agent,
        );
        let fulltext_agent = DqnAgent::new(FULLTEXT_EMBED_DIM, FULLTEXT_ACTIONS, &config.agent);
        let checker =
            PrismaChecker::new(RewardSystem::new(Box::new(HashingEmbedder::for_abstracts())));

        Self {
            abstract_agent,
            fulltext_agent,
            checker,
            fulltext_embedder: HashingEmbedder::for_full_text(),
        }
    }

    /// Restore filter-agent checkpoints; missing files are cold starts
    pub fn load_models(&mut self, model_dir: &Path) -> Result<()> {
        self.abstract_agent
            .load_model(&model_dir.join(ABSTRACT_MODEL))?;
        self.fulltext_agent
            .load_model(&model_dir.join(FULLTEXT_MODEL))?;
        Ok(())
    }

    pub fn checker(&self) -> &PrismaChecker {
        &self.checker
    }

    pub fn checker_mut(&mut self) -> &mut PrismaChecker {
        &mut self.checker
    }

    /// Screen `papers`, optionally pulling full text through `source`.
    ///
    /// A `None` from the source falls back to the abstract; a source
    /// failure aborts the run and surfaces at the orchestration boundary.
    pub fn screen(
        &mut self,
        papers: &[PaperRecord],
        source: Option<&dyn FullTextSource>,
    ) -> Result<Vec<ScreeningRecord>> {
        let mut records = Vec::with_capacity(papers.len());

        for paper in papers {
            let full_text = match source {
                Some(source) => source.fetch(&paper.url)?,
                None => None,
            };
            let full_text = full_text.as_deref().unwrap_or(&paper.summary);

            let abstract_embedding = self.checker.rewards().embed_text(&paper.summary);
            let abstract_action = self.abstract_agent.act(&abstract_embedding, false);
            let abstract_reward = self.checker.evaluate_abstract_reward(paper, abstract_action);

            let fulltext_state = self.fulltext_embedder.embed(full_text);
            let fulltext_action = self.fulltext_agent.act(&fulltext_state, false);
            let fulltext_reward =
                self.checker
                    .evaluate_fulltext_reward(paper, full_text, fulltext_action);

            let score = (abstract_reward + fulltext_reward) / 2.0;
            debug!(paper = %paper.id, action = abstract_action, score, "paper screened");

            records.push(ScreeningRecord {
                paper_id: paper.id,
                title: paper.title.clone(),
                year: paper.published,
                url: paper.url.clone(),
                decision: FilterDecision::from_action(abstract_action),
                abstract_text: paper.summary.clone(),
                score,
                authors: paper.authors.join(", "),
                screened_at: Utc::now(),
            });
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slr_core::SlrError;

    struct FailingSource;

    impl FullTextSource for FailingSource {
        fn fetch(&self, _url: &str) -> Result<Option<String>> {
            Err(SlrError::Source("parser crashed".to_string()))
        }
    }

    struct EmptySource;

    impl FullTextSource for EmptySource {
        fn fetch(&self, _url: &str) -> Result<Option<String>> {
            Ok(None)
        }
    }

    fn papers() -> Vec<PaperRecord> {
        vec![
            PaperRecord::new(
                "First",
                "A method with strong experimental results.",
                2023,
                "https://example.org/abs/1",
            )
            .with_authors(vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()]),
            PaperRecord::new("Second", "A short note.", 2021, "https://example.org/abs/2"),
        ]
    }

    #[test]
    fn test_screen_produces_one_record_per_paper() {
        let mut pipeline = ScreeningPipeline::new(&ReviewConfig::default());
        let papers = papers();
        let records = pipeline.screen(&papers, None).unwrap();

        assert_eq!(records.len(), 2);
        for (paper, record) in papers.iter().zip(&records) {
            assert_eq!(record.paper_id, paper.id);
            assert!((-1.0..=1.0).contains(&record.score));
        }
        assert_eq!(records[0].authors, "Ada Lovelace, Alan Turing");
    }

    #[test]
    fn test_screen_missing_full_text_falls_back_to_abstract() {
        let mut pipeline = ScreeningPipeline::new(&ReviewConfig::default());
        let records = pipeline.screen(&papers(), Some(&EmptySource)).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_screen_source_failure_aborts_run() {
        let mut pipeline = ScreeningPipeline::new(&ReviewConfig::default());
        assert!(pipeline.screen(&papers(), Some(&FailingSource)).is_err());
    }
}
