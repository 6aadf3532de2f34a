//! Interfaces to the external literature collaborators
//!
//! Querying a literature source and extracting full text are outside this
//! system; the pipeline only sees these traits and the `PaperRecord`s they
//! yield. Calls are blocking and happen before the scoring/learning path.

use crate::error::Result;
use crate::paper::PaperRecord;

/// Literature search collaborator (e.g. an arXiv client)
pub trait PaperSource {
    /// Retrieve up to `max_results` papers on `topic` published within
    /// `[from_year, to_year]`.
    fn search(
        &self,
        topic: &str,
        from_year: i32,
        to_year: i32,
        max_results: usize,
    ) -> Result<Vec<PaperRecord>>;
}

/// Full-text extraction collaborator (e.g. a PDF parser)
pub trait FullTextSource {
    /// Fetch the full text behind `url`. `Ok(None)` means no text could be
    /// extracted and the caller falls back to the abstract.
    fn fetch(&self, url: &str) -> Result<Option<String>>;
}
