//! SLR Review - reward computation and training orchestration
//!
//! The cooperative layer above the agents: scalar rewards for search
//! results, filter decisions, and PRISMA compliance; the checker that
//! aggregates them; the trainer that runs epochs across all three agents;
//! the inference-side screening pipeline; and the session-keyed agent
//! store used by interactive frontends.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

pub mod prisma;
pub mod rewards;
pub mod screen;
pub mod session;
pub mod trainer;

pub use prisma::PrismaChecker;
pub use rewards::{HumanFeedback, RewardSystem, FEEDBACK_CAPACITY, FEEDBACK_WINDOW};
pub use screen::ScreeningPipeline;
pub use session::SessionStore;
pub use trainer::{
    EpochStats, ReviewTrainer, TrainingReport, TrainingSample, ABSTRACT_ACTIONS, ABSTRACT_MODEL,
    FULLTEXT_ACTIONS, FULLTEXT_MODEL, SEARCH_ACTIONS, SEARCH_MODEL,
};
