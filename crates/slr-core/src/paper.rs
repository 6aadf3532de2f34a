//! Paper records and screening results
//!
//! Every paper gets a `PaperId` at ingest time and the id is carried through
//! every pipeline stage, so abstract and full-text scores are merged by
//! identifier rather than by title string.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a paper within a review run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaperId(pub Uuid);

impl PaperId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PaperId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PaperId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session identifier for dashboard-scoped agent sets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A paper retrieved by the external search collaborator.
///
/// Immutable once constructed; the screening pipeline never mutates records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    #[serde(default)]
    pub id: PaperId,
    pub title: String,
    pub summary: String,
    /// Publication year
    pub published: i32,
    pub url: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub citation_count: Option<u32>,
}

impl PaperRecord {
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        published: i32,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: PaperId::new(),
            title: title.into(),
            summary: summary.into(),
            published,
            url: url.into(),
            authors: Vec::new(),
            citation_count: None,
        }
    }

    pub fn with_authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    pub fn with_citation_count(mut self, count: u32) -> Self {
        self.citation_count = Some(count);
        self
    }
}

/// Triage decision at the abstract or full-text stage.
///
/// The discriminants double as the discrete action ids of the filter agents:
/// the abstract agent picks from all three, the full-text agent from
/// exclude/maybe (0/1) only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterDecision {
    Exclude,
    Maybe,
    Include,
}

impl FilterDecision {
    /// Map a discrete action id to a decision. Out-of-range ids fall back
    /// to `Exclude`.
    pub fn from_action(action: usize) -> Self {
        match action {
            1 => FilterDecision::Maybe,
            2 => FilterDecision::Include,
            _ => FilterDecision::Exclude,
        }
    }

    pub fn to_action(self) -> usize {
        match self {
            FilterDecision::Exclude => 0,
            FilterDecision::Maybe => 1,
            FilterDecision::Include => 2,
        }
    }
}

impl std::fmt::Display for FilterDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterDecision::Exclude => write!(f, "Exclude"),
            FilterDecision::Maybe => write!(f, "Maybe"),
            FilterDecision::Include => write!(f, "Include"),
        }
    }
}

/// One screened paper, ready for the external export collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningRecord {
    pub paper_id: PaperId,
    pub title: String,
    pub year: i32,
    pub url: String,
    pub decision: FilterDecision,
    pub abstract_text: String,
    pub score: f32,
    /// Comma-joined author names
    pub authors: String,
    pub screened_at: DateTime<Utc>,
}

/// Sort screening records by score descending and keep the top `top_n`
pub fn rank_records(mut records: Vec<ScreeningRecord>, top_n: usize) -> Vec<ScreeningRecord> {
    records.sort_by(|a, b| b.score.total_cmp(&a.score));
    records.truncate(top_n);
    records
}
