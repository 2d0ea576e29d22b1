mod controller;

use std::sync::Arc;

use kotori_core::conversion::{
    Candidate, ConversionEngine, ConversionError, ConversionResults, ConvertOptions,
    ReadingTable, TableEngine,
};
use kotori_core::settings::Settings;

use crate::action::Modifiers;
use crate::executor::{CandidateUi, HostClient};
use crate::keymap::{key, KeyEvent};
use crate::session::{CandidateWindow, MarkedText, Session, SessionConfig};
use crate::InputController;

pub(super) const TEST_DICT: &str = r#"
[entries]
"きょう" = ["今日", "京"]
"は" = ["は", "葉"]
"いい" = ["良い", "いい"]
"てんき" = ["天気"]
"てん" = ["天", "点"]
"き" = ["木", "気"]
"わたし" = ["私"]
"です" = ["です"]
"#;

pub(super) fn make_test_engine() -> Arc<TableEngine> {
    Arc::new(TableEngine::new(ReadingTable::from_toml(TEST_DICT).unwrap()))
}

pub(super) fn test_config(live_conversion: bool) -> SessionConfig {
    SessionConfig {
        live_conversion,
        ..SessionConfig::default()
    }
}

pub(super) fn test_settings(live_conversion: bool) -> Settings {
    let mut settings = Settings::default();
    settings.conversion.live_conversion = live_conversion;
    settings
}

pub(super) fn make_session(live_conversion: bool) -> Session {
    Session::new(make_test_engine(), test_config(live_conversion))
}

/// Type romaji into a session one character at a time.
pub(super) fn type_romaji(session: &mut Session, romaji: &str) {
    for ch in romaji.chars() {
        session.insert_at_cursor_position(&ch.to_string());
    }
}

pub(super) fn texts(candidates: &[Candidate]) -> Vec<String> {
    candidates.iter().map(|c| c.text.clone()).collect()
}

/// Engine that always fails.
pub(super) struct FailingEngine;

impl ConversionEngine for FailingEngine {
    fn request_candidates(
        &self,
        _target: &str,
        _options: &ConvertOptions,
    ) -> Result<ConversionResults, ConversionError> {
        Err(ConversionError::Unavailable)
    }

    fn complete_candidate(&self, _candidate: &Candidate) {}

    fn reset_session(&self) {}
}

/// Engine returning fixed results regardless of target.
pub(super) struct FixedEngine(pub ConversionResults);

impl ConversionEngine for FixedEngine {
    fn request_candidates(
        &self,
        _target: &str,
        _options: &ConvertOptions,
    ) -> Result<ConversionResults, ConversionError> {
        Ok(self.0.clone())
    }

    fn complete_candidate(&self, _candidate: &Candidate) {}

    fn reset_session(&self) {}
}

/// Host client recording everything the executor does.
#[derive(Default)]
pub(super) struct RecordingHost {
    pub committed: String,
    pub marked: Option<MarkedText>,
    pub surrounding: Option<String>,
    pub layouts: Vec<String>,
    pub modes: Vec<String>,
}

impl RecordingHost {
    pub fn marked_text(&self) -> String {
        self.marked.as_ref().map(MarkedText::text).unwrap_or_default()
    }
}

impl HostClient for RecordingHost {
    fn insert_text(&mut self, text: &str) {
        self.committed.push_str(text);
    }

    fn set_marked_text(&mut self, marked: &MarkedText) {
        self.marked = Some(marked.clone());
    }

    fn surrounding_text(&mut self, _max_chars: usize) -> Option<String> {
        self.surrounding.clone()
    }

    fn override_keyboard_layout(&mut self, layout_id: &str) {
        self.layouts.push(layout_id.to_string());
    }

    fn switch_input_mode(&mut self, mode_id: &str) {
        self.modes.push(mode_id.to_string());
    }
}

#[derive(Default)]
pub(super) struct RecordingUi {
    pub window: Option<CandidateWindow>,
}

impl CandidateUi for RecordingUi {
    fn show(&mut self, window: &CandidateWindow) {
        self.window = Some(window.clone());
    }

    fn hide(&mut self) {
        self.window = None;
    }
}

/// Controller plus recording host and UI.
pub(super) struct Harness {
    pub controller: InputController,
    pub host: RecordingHost,
    pub ui: RecordingUi,
}

impl Harness {
    pub fn new(live_conversion: bool) -> Self {
        Self::with_engine(make_test_engine(), live_conversion)
    }

    pub fn with_engine(engine: Arc<dyn ConversionEngine>, live_conversion: bool) -> Self {
        Self {
            controller: InputController::new(engine, test_settings(live_conversion)),
            host: RecordingHost::default(),
            ui: RecordingUi::default(),
        }
    }

    pub fn send(&mut self, event: KeyEvent) -> bool {
        self.controller
            .handle_event(&event, &mut self.host, &mut self.ui)
    }

    pub fn type_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.send(KeyEvent::text(&ch.to_string()));
        }
    }

    pub fn press(&mut self, key_code: u16) -> bool {
        self.send(KeyEvent::key(key_code))
    }

    pub fn press_shift(&mut self, key_code: u16) -> bool {
        self.send(KeyEvent::key(key_code).with_modifiers(Modifiers::shift()))
    }

    pub fn enter(&mut self) -> bool {
        self.press(key::ENTER)
    }

    pub fn space(&mut self) -> bool {
        self.press(key::SPACE)
    }
}
