//! SLR Core - Core types, traits, and shared functionality
//!
//! This crate provides the foundational types used across all SLR components:
//! paper records, the PRISMA checklist, text embedding, configuration, and
//! the interfaces to the external search and full-text collaborators.

// Clippy pedantic allows - these are intentional design choices
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod checklist;
pub mod config;
pub mod embedding;
pub mod error;
pub mod paper;
pub mod source;

pub use checklist::{PrismaChecklist, CHECKLIST_ITEMS};
pub use config::{AgentConfig, PolicyKind, ReviewConfig};
pub use embedding::{
    cosine_similarity, Embedder, HashingEmbedder, ABSTRACT_EMBED_DIM, FULLTEXT_EMBED_DIM,
};
pub use error::{Result, SlrError};
pub use paper::{rank_records, FilterDecision, PaperId, PaperRecord, ScreeningRecord, SessionId};
pub use source::{FullTextSource, PaperSource};
