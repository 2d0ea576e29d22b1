//! Host client and candidate UI that record `KotoriEvent`s for Swift.

use std::cell::RefCell;

use kotori_session::{CandidateUi, CandidateWindow, HostClient, MarkedText};

use super::types::{marked_text_event, show_candidates_event, KotoriEvent};

/// Events collected during one call, in the order they happened.
#[derive(Default)]
pub(super) struct EventLog {
    events: RefCell<Vec<KotoriEvent>>,
    surrounding: Option<String>,
}

impl EventLog {
    pub(super) fn with_surrounding(surrounding: Option<String>) -> Self {
        Self {
            events: RefCell::new(Vec::new()),
            surrounding,
        }
    }

    pub(super) fn push(&self, event: KotoriEvent) {
        self.events.borrow_mut().push(event);
    }

    pub(super) fn host(&self) -> EventHost<'_> {
        EventHost { log: self }
    }

    pub(super) fn ui(&self) -> EventUi<'_> {
        EventUi { log: self }
    }

    pub(super) fn into_events(self) -> Vec<KotoriEvent> {
        self.events.into_inner()
    }
}

pub(super) struct EventHost<'a> {
    log: &'a EventLog,
}

impl HostClient for EventHost<'_> {
    fn insert_text(&mut self, text: &str) {
        self.log.push(KotoriEvent::Commit {
            text: text.to_string(),
        });
    }

    fn set_marked_text(&mut self, marked: &MarkedText) {
        self.log.push(marked_text_event(marked));
    }

    fn surrounding_text(&mut self, max_chars: usize) -> Option<String> {
        let text = self.log.surrounding.as_ref()?;
        let skip = text.chars().count().saturating_sub(max_chars);
        Some(text.chars().skip(skip).collect())
    }

    fn override_keyboard_layout(&mut self, layout_id: &str) {
        self.log.push(KotoriEvent::OverrideKeyboardLayout {
            layout_id: layout_id.to_string(),
        });
    }

    fn switch_input_mode(&mut self, mode_id: &str) {
        self.log.push(KotoriEvent::SwitchInputMode {
            mode_id: mode_id.to_string(),
        });
    }
}

pub(super) struct EventUi<'a> {
    log: &'a EventLog,
}

impl CandidateUi for EventUi<'_> {
    fn show(&mut self, window: &CandidateWindow) {
        self.log.push(show_candidates_event(window));
    }

    fn hide(&mut self) {
        self.log.push(KotoriEvent::HideCandidates);
    }
}
