//! Segment/candidate manager.
//!
//! `Session` owns the composing buffer and the most recent conversion result,
//! derives the displayed candidate list, tracks the selection and segment
//! edits, and renders marked text for the host.

mod candidates;
mod debug_log;
mod editing;
mod marked_text;

use std::sync::Arc;

use tracing::{debug, warn};

use kotori_core::composing::ComposingText;
use kotori_core::conversion::{
    Candidate, ConversionEngine, ConversionError, ConversionLanguage, ConversionResults,
    ConvertOptions,
};
use kotori_core::settings::{LearningPolicy, Settings};

pub use candidates::{derive_candidates, CandidateWindow};
pub use debug_log::{DebugCandidateLog, DEBUG_LOG_CAPACITY};
pub use marked_text::{Focus, MarkedRun, MarkedText};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LastOperation {
    Insert,
    Delete,
    EditSegment,
    #[default]
    Other,
}

/// How conversion requests reach the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Dispatch {
    /// Call the engine inside the operation that issued the request.
    #[default]
    Immediate,
    /// Store the request for an external worker; results come back through
    /// `receive_results`.
    Deferred,
}

/// A conversion request waiting for an external worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub generation: u64,
    pub target: String,
    pub options: ConvertOptions,
}

/// Per-session toggles, seeded from `Settings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub live_conversion: bool,
    pub english_conversion: bool,
    pub learning: LearningPolicy,
    pub max_candidates: usize,
    pub left_context_chars: usize,
    pub debug_candidate_window: bool,
}

impl From<&Settings> for SessionConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            live_conversion: settings.conversion.live_conversion,
            english_conversion: settings.conversion.english_conversion,
            learning: settings.conversion.learning,
            max_candidates: settings.conversion.max_candidates,
            left_context_chars: settings.conversion.left_context_chars,
            debug_candidate_window: settings.debug.candidate_window,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

pub struct Session {
    engine: Arc<dyn ConversionEngine>,
    config: SessionConfig,
    dispatch: Dispatch,

    buffer: ComposingText,
    raw_results: Option<ConversionResults>,
    /// Index into `candidates()`. Reset whenever `raw_results` changes.
    selection_index: Option<usize>,
    did_experience_segment_edition: bool,
    last_operation: LastOperation,
    should_show_candidate_window: bool,
    /// Select the first candidate once deferred results arrive.
    select_first_on_results: bool,
    left_context: Option<String>,

    generation: u64,
    pending_request: Option<ConversionRequest>,
    debug_log: DebugCandidateLog,
}

impl Session {
    pub fn new(engine: Arc<dyn ConversionEngine>, config: SessionConfig) -> Self {
        Self {
            engine,
            config,
            dispatch: Dispatch::Immediate,
            buffer: ComposingText::new(),
            raw_results: None,
            selection_index: None,
            did_experience_segment_edition: false,
            last_operation: LastOperation::Other,
            should_show_candidate_window: false,
            select_first_on_results: false,
            left_context: None,
            generation: 0,
            pending_request: None,
            debug_log: DebugCandidateLog::new(),
        }
    }

    pub fn set_dispatch(&mut self, dispatch: Dispatch) {
        self.dispatch = dispatch;
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn set_live_conversion(&mut self, enabled: bool) {
        self.config.live_conversion = enabled;
    }

    pub fn set_english_conversion(&mut self, enabled: bool) {
        self.config.english_conversion = enabled;
    }

    pub fn set_debug_candidate_window(&mut self, enabled: bool) {
        self.config.debug_candidate_window = enabled;
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn raw_text(&self) -> String {
        self.buffer.text()
    }

    pub fn cursor(&self) -> usize {
        self.buffer.cursor()
    }

    pub fn buffer(&self) -> &ComposingText {
        &self.buffer
    }

    pub fn last_operation(&self) -> LastOperation {
        self.last_operation
    }

    pub fn did_experience_segment_edition(&self) -> bool {
        self.did_experience_segment_edition
    }

    pub fn should_show_candidate_window(&self) -> bool {
        self.should_show_candidate_window
    }

    pub fn raw_results(&self) -> Option<&ConversionResults> {
        self.raw_results.as_ref()
    }

    pub fn left_context(&self) -> Option<&str> {
        self.left_context.as_deref()
    }

    /// Remember the text before the insertion point, keeping only the
    /// configured number of trailing characters.
    pub fn set_left_context(&mut self, text: Option<String>) {
        self.left_context = text.filter(|t| !t.is_empty()).map(|t| {
            let skip = t
                .chars()
                .count()
                .saturating_sub(self.config.left_context_chars);
            t.chars().skip(skip).collect()
        });
    }

    pub fn debug_log(&self) -> &DebugCandidateLog {
        &self.debug_log
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Forward a committed candidate to the engine for learning.
    pub fn learn(&self, candidate: &Candidate) {
        self.engine.complete_candidate(candidate);
    }

    // --- conversion requests ---

    fn convert_options(&self, rich: bool) -> ConvertOptions {
        ConvertOptions {
            language: ConversionLanguage::Japanese,
            english_prediction: self.config.english_conversion,
            learning: self.config.learning,
            rich_candidates: rich,
            max_results: self.config.max_candidates,
            left_context: self.left_context.clone(),
        }
    }

    /// Invalidate the current result and request candidates for the buffer
    /// up to the cursor.
    fn request_candidates(&mut self, rich: bool) {
        self.raw_results = None;
        self.selection_index = None;
        self.generation += 1;
        self.pending_request = None;
        if self.buffer.is_empty() {
            self.did_experience_segment_edition = false;
        }

        let target = self.buffer.prefix_to_cursor();
        if target.is_empty() {
            self.select_first_on_results = false;
            return;
        }
        let options = self.convert_options(rich);
        debug!(generation = self.generation, %target, rich, "request candidates");
        match self.dispatch {
            Dispatch::Immediate => {
                let result = self.engine.request_candidates(&target, &options);
                self.apply_results(result);
            }
            Dispatch::Deferred => {
                self.pending_request = Some(ConversionRequest {
                    generation: self.generation,
                    target,
                    options,
                });
            }
        }
    }

    /// The request the external worker should run next, if any.
    pub fn take_pending_request(&mut self) -> Option<ConversionRequest> {
        self.pending_request.take()
    }

    pub fn has_pending_request(&self) -> bool {
        self.pending_request.is_some()
    }

    /// Deliver a deferred result. Returns false for superseded generations.
    pub fn receive_results(
        &mut self,
        generation: u64,
        result: Result<ConversionResults, ConversionError>,
    ) -> bool {
        if generation != self.generation {
            debug!(generation, latest = self.generation, "stale results dropped");
            return false;
        }
        self.pending_request = None;
        self.apply_results(result);
        true
    }

    fn apply_results(&mut self, result: Result<ConversionResults, ConversionError>) {
        self.raw_results = match result {
            Ok(results) => Some(results),
            Err(e) => {
                warn!("conversion failed: {e}");
                None
            }
        };
        self.selection_index = None;
        if self.config.debug_candidate_window {
            if let Some(results) = &self.raw_results {
                for candidate in results.main.iter().rev() {
                    self.debug_log.record(candidate.clone());
                }
            }
        }
        if std::mem::take(&mut self.select_first_on_results) && !self.candidates().is_empty() {
            self.selection_index = Some(0);
        }
    }

    // --- lifecycle ---

    /// End the current composition: the buffer and every piece of
    /// per-composition state are cleared.
    pub fn stop_composition(&mut self) {
        self.buffer.clear();
        self.clear_conversion_state();
    }

    /// Leave Japanese input. Conversion state is dropped; the buffer is left
    /// to the caller, which commits it first.
    pub fn stop_japanese_input(&mut self) {
        self.clear_conversion_state();
        self.left_context = None;
    }

    /// Tear the session down on deactivation, including engine state.
    pub fn deactivate(&mut self) {
        self.stop_composition();
        self.left_context = None;
        self.engine.reset_session();
    }

    fn clear_conversion_state(&mut self) {
        self.raw_results = None;
        self.did_experience_segment_edition = false;
        self.last_operation = LastOperation::Other;
        self.selection_index = None;
        self.should_show_candidate_window = false;
        self.select_first_on_results = false;
        self.pending_request = None;
        self.generation += 1;
    }
}
