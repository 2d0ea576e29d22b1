//! The conversion-engine contract.
//!
//! The engine that turns kana into ranked candidates is an external
//! collaborator. The session only depends on `ConversionEngine`; `TableEngine`
//! is a small deterministic implementation used by tests and the CLI.

mod dictionary;
mod table;


pub use dictionary::{DictionaryError, ReadingTable};
pub use table::TableEngine;

use crate::settings::LearningPolicy;

/// One reading→surface pair inside a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateSegment {
    pub reading: String,
    pub surface: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub text: String,
    pub score: f32,
    /// How many leading buffer units this candidate covers.
    pub corresponding_count: usize,
    pub associated_data: Vec<CandidateSegment>,
}

impl Candidate {
    pub fn new(text: impl Into<String>, corresponding_count: usize) -> Self {
        Self {
            text: text.into(),
            score: 0.0,
            corresponding_count,
            associated_data: Vec::new(),
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn with_segments(mut self, segments: Vec<CandidateSegment>) -> Self {
        self.associated_data = segments;
        self
    }
}

/// Raw engine output for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionResults {
    /// Candidates covering only the first clause of the target.
    pub first_clause: Vec<Candidate>,
    /// Candidates covering the whole target.
    pub main: Vec<Candidate>,
}

impl ConversionResults {
    pub fn is_empty(&self) -> bool {
        self.first_clause.is_empty() && self.main.is_empty()
    }

    pub fn max_first_clause_count(&self) -> Option<usize> {
        self.first_clause.iter().map(|c| c.corresponding_count).max()
    }

    pub fn max_main_count(&self) -> Option<usize> {
        self.main.iter().map(|c| c.corresponding_count).max()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversionLanguage {
    #[default]
    Japanese,
    English,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub language: ConversionLanguage,
    pub english_prediction: bool,
    pub learning: LearningPolicy,
    /// Slower, higher-quality candidates (segment edits, explicit selection).
    pub rich_candidates: bool,
    pub max_results: usize,
    /// Text before the insertion point, if the host provided any.
    pub left_context: Option<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            language: ConversionLanguage::Japanese,
            english_prediction: false,
            learning: LearningPolicy::InputAndOutput,
            rich_candidates: false,
            max_results: 30,
            left_context: None,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    #[error("empty conversion target")]
    EmptyInput,
    #[error("conversion engine error: {0}")]
    Engine(String),
    #[error("conversion engine unavailable")]
    Unavailable,
}

/// External conversion engine. Implementations must tolerate being called
/// from a background worker thread.
pub trait ConversionEngine: Send + Sync {
    fn request_candidates(
        &self,
        target: &str,
        options: &ConvertOptions,
    ) -> Result<ConversionResults, ConversionError>;

    /// Persist/learn a committed candidate.
    fn complete_candidate(&self, candidate: &Candidate);

    /// Drop any per-session state (caches, context).
    fn reset_session(&self);
}
