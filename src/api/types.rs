use kotori_core::conversion::{
    Candidate, CandidateSegment, ConversionError, ConversionLanguage, ConversionResults,
    ConvertOptions,
};
use kotori_core::settings::LearningPolicy;
use kotori_session::{CandidateWindow, Focus, MarkedText};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum KotoriError {
    #[error("IO error: {msg}")]
    Io { msg: String },
    #[error("invalid data: {msg}")]
    InvalidData { msg: String },
    #[error("conversion error: {msg}")]
    Conversion { msg: String },
}

impl From<uniffi::UnexpectedUniFFICallbackError> for KotoriError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        KotoriError::Conversion { msg: e.reason }
    }
}

impl From<KotoriError> for ConversionError {
    fn from(e: KotoriError) -> Self {
        ConversionError::Engine(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Records (value types, copied across FFI boundary)
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, uniffi::Record)]
pub struct KotoriSegment {
    pub reading: String,
    pub surface: String,
}

#[derive(Clone, Debug, uniffi::Record)]
pub struct KotoriCandidate {
    pub text: String,
    pub score: f32,
    pub corresponding_count: u32,
    pub segments: Vec<KotoriSegment>,
}

#[derive(Clone, Debug, Default, uniffi::Record)]
pub struct KotoriConversionResults {
    pub first_clause: Vec<KotoriCandidate>,
    pub main: Vec<KotoriCandidate>,
}

#[derive(Clone, Debug, uniffi::Record)]
pub struct KotoriConvertOptions {
    pub english: bool,
    pub english_prediction: bool,
    pub learning: KotoriLearning,
    pub rich_candidates: bool,
    pub max_results: u32,
    pub left_context: Option<String>,
}

#[derive(Clone, Debug, uniffi::Record)]
pub struct KotoriMarkedRun {
    pub content: String,
    pub focus: KotoriFocus,
}

#[derive(uniffi::Record)]
pub struct KotoriRomajiConvert {
    pub composed_kana: String,
    pub pending_romaji: String,
}

/// Event-driven response from handle_key / poll and the pointer callbacks.
#[derive(Debug, uniffi::Record)]
pub struct KotoriKeyResponse {
    pub consumed: bool,
    pub events: Vec<KotoriEvent>,
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum KotoriLearning {
    InputAndOutput,
    OnlyOutput,
    Nothing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum KotoriFocus {
    Focused,
    Unfocused,
    None,
}

#[derive(Clone, Debug, uniffi::Enum)]
pub enum KotoriEvent {
    Commit {
        text: String,
    },
    SetMarkedText {
        runs: Vec<KotoriMarkedRun>,
        selection_start: u32,
        selection_end: u32,
    },
    ShowCandidates {
        surfaces: Vec<String>,
        selected: Option<u32>,
        selecting: bool,
    },
    HideCandidates,
    SwitchInputMode {
        mode_id: String,
    },
    OverrideKeyboardLayout {
        layout_id: String,
    },
    SchedulePoll,
}

#[derive(Clone, Debug, uniffi::Enum)]
pub enum KotoriCandidateWindow {
    Hidden,
    Composing {
        candidates: Vec<KotoriCandidate>,
        selection: Option<u32>,
    },
    Selecting {
        candidates: Vec<KotoriCandidate>,
        selection: Option<u32>,
    },
}

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

impl From<&Candidate> for KotoriCandidate {
    fn from(c: &Candidate) -> Self {
        Self {
            text: c.text.clone(),
            score: c.score,
            corresponding_count: c.corresponding_count as u32,
            segments: c
                .associated_data
                .iter()
                .map(|s| KotoriSegment {
                    reading: s.reading.clone(),
                    surface: s.surface.clone(),
                })
                .collect(),
        }
    }
}

impl From<KotoriCandidate> for Candidate {
    fn from(c: KotoriCandidate) -> Self {
        Candidate::new(c.text, c.corresponding_count as usize)
            .with_score(c.score)
            .with_segments(
                c.segments
                    .into_iter()
                    .map(|s| CandidateSegment {
                        reading: s.reading,
                        surface: s.surface,
                    })
                    .collect(),
            )
    }
}

impl From<KotoriConversionResults> for ConversionResults {
    fn from(r: KotoriConversionResults) -> Self {
        Self {
            first_clause: r.first_clause.into_iter().map(Candidate::from).collect(),
            main: r.main.into_iter().map(Candidate::from).collect(),
        }
    }
}

impl From<LearningPolicy> for KotoriLearning {
    fn from(p: LearningPolicy) -> Self {
        match p {
            LearningPolicy::InputAndOutput => Self::InputAndOutput,
            LearningPolicy::OnlyOutput => Self::OnlyOutput,
            LearningPolicy::Nothing => Self::Nothing,
        }
    }
}

impl From<&ConvertOptions> for KotoriConvertOptions {
    fn from(o: &ConvertOptions) -> Self {
        Self {
            english: o.language == ConversionLanguage::English,
            english_prediction: o.english_prediction,
            learning: o.learning.into(),
            rich_candidates: o.rich_candidates,
            max_results: o.max_results as u32,
            left_context: o.left_context.clone(),
        }
    }
}

impl From<Focus> for KotoriFocus {
    fn from(f: Focus) -> Self {
        match f {
            Focus::Focused => Self::Focused,
            Focus::Unfocused => Self::Unfocused,
            Focus::None => Self::None,
        }
    }
}

pub(super) fn marked_text_event(marked: &MarkedText) -> KotoriEvent {
    KotoriEvent::SetMarkedText {
        runs: marked
            .runs
            .iter()
            .map(|r| KotoriMarkedRun {
                content: r.content.clone(),
                focus: r.focus.into(),
            })
            .collect(),
        selection_start: marked.selection.start as u32,
        selection_end: marked.selection.end as u32,
    }
}

pub(super) fn show_candidates_event(window: &CandidateWindow) -> KotoriEvent {
    KotoriEvent::ShowCandidates {
        surfaces: window.candidates().iter().map(|c| c.text.clone()).collect(),
        selected: window.selection().map(|i| i as u32),
        selecting: matches!(window, CandidateWindow::Selecting { .. }),
    }
}

impl From<&CandidateWindow> for KotoriCandidateWindow {
    fn from(window: &CandidateWindow) -> Self {
        let convert = |list: &[Candidate]| -> Vec<KotoriCandidate> {
            list.iter().map(KotoriCandidate::from).collect()
        };
        match window {
            CandidateWindow::Hidden => Self::Hidden,
            CandidateWindow::Composing {
                candidates,
                selection,
            } => Self::Composing {
                candidates: convert(candidates),
                selection: selection.map(|i| i as u32),
            },
            CandidateWindow::Selecting {
                candidates,
                selection,
            } => Self::Selecting {
                candidates: convert(candidates),
                selection: selection.map(|i| i as u32),
            },
        }
    }
}
