//! Runs `ClientAction`s against the session, the host text client and the
//! candidate UI.

use tracing::debug;

use kotori_core::conversion::Candidate;
use kotori_core::settings::Settings;

use crate::action::{ClientAction, InputMode};
use crate::session::{CandidateWindow, MarkedText, Session};
use crate::state_machine::CompositionState;

/// The application receiving text.
pub trait HostClient {
    fn insert_text(&mut self, text: &str);
    fn set_marked_text(&mut self, marked: &MarkedText);
    /// Up to `max_chars` characters before the insertion point.
    fn surrounding_text(&mut self, max_chars: usize) -> Option<String>;
    fn override_keyboard_layout(&mut self, layout_id: &str);
    fn switch_input_mode(&mut self, mode_id: &str);
}

/// The candidate window.
pub trait CandidateUi {
    fn show(&mut self, window: &CandidateWindow);
    fn hide(&mut self);
}

pub struct ActionExecutor<'a> {
    pub session: &'a mut Session,
    pub state: &'a mut CompositionState,
    pub mode: &'a mut InputMode,
    pub settings: &'a Settings,
    pub host: &'a mut dyn HostClient,
    pub ui: &'a mut dyn CandidateUi,
}

impl ActionExecutor<'_> {
    /// Execute `action`. Returns whether the key was handled.
    pub fn run(&mut self, action: &ClientAction) -> bool {
        match action {
            ClientAction::Consume => true,
            ClientAction::Fallthrough => false,
            ClientAction::Sequence(actions) => {
                let mut handled = false;
                for action in actions {
                    handled |= self.run(action);
                }
                handled
            }
            leaf => {
                self.apply(leaf);
                self.refresh();
                true
            }
        }
    }

    fn apply(&mut self, action: &ClientAction) {
        match action {
            ClientAction::ShowCandidateWindow => self.session.show_candidate_window(),
            ClientAction::HideCandidateWindow => self.session.hide_candidate_window(),
            ClientAction::AppendToMarkedText(text) => {
                if self.session.is_empty() {
                    let context = self
                        .host
                        .surrounding_text(self.settings.conversion.left_context_chars);
                    self.session.set_left_context(context);
                }
                self.session.insert_at_cursor_position(text);
                *self.state = CompositionState::Composing;
            }
            ClientAction::RemoveLastMarkedText => {
                self.session.delete_backward(1);
                if self.session.is_empty() {
                    self.session.stop_composition();
                    *self.state = CompositionState::Idle;
                }
            }
            ClientAction::CommitMarkedText => self.commit_marked_text(),
            ClientAction::SubmitSelectedCandidate => {
                match self.session.candidate_for_submit() {
                    Some(candidate) => self.submit(&candidate),
                    None => self.commit_raw_text(),
                }
            }
            ClientAction::SelectNextCandidate => self.session.select_next_candidate(),
            ClientAction::SelectPrevCandidate => self.session.select_prev_candidate(),
            ClientAction::SelectNumberCandidate(n) => {
                match self.session.select_number_candidate(*n) {
                    Some(candidate) => self.submit(&candidate),
                    None => self.reconcile_after_submit(),
                }
            }
            ClientAction::EditSegment(delta) => self.session.edit_segment(*delta),
            ClientAction::EnterCandidateSelectionMode => {
                self.session.enter_candidate_selection_mode()
            }
            ClientAction::StopComposition => {
                self.session.stop_composition();
                *self.state = CompositionState::Idle;
            }
            ClientAction::SelectInputMode(mode) => self.select_input_mode(*mode),
            ClientAction::Consume | ClientAction::Fallthrough | ClientAction::Sequence(_) => {}
        }
    }

    /// Commit `candidate` as the leading segment.
    pub fn submit(&mut self, candidate: &Candidate) {
        debug!(text = %candidate.text, count = candidate.corresponding_count, "submit");
        self.host.insert_text(&candidate.text);
        self.session.prefix_candidate_committed(candidate);
        self.reconcile_after_submit();
    }

    fn reconcile_after_submit(&mut self) {
        if self.session.is_empty() {
            self.session.stop_composition();
            *self.state = CompositionState::Idle;
        } else {
            *self.state = CompositionState::Selecting;
        }
    }

    fn commit_marked_text(&mut self) {
        let (text, shown) = self.session.flush_for_commit();
        if let Some(candidate) = &shown {
            self.session.learn(candidate);
        }
        if !text.is_empty() {
            self.host.insert_text(&text);
        }
        self.session.stop_composition();
        *self.state = CompositionState::Idle;
    }

    fn commit_raw_text(&mut self) {
        self.session.flush_pending_romaji();
        let text = self.session.raw_text();
        if !text.is_empty() {
            self.host.insert_text(&text);
        }
        self.session.stop_composition();
        *self.state = CompositionState::Idle;
    }

    fn select_input_mode(&mut self, mode: InputMode) {
        *self.mode = mode;
        let settings = self.settings;
        let ids = &settings.input_mode;
        match mode {
            InputMode::Roman => {
                if !self.session.is_empty() {
                    self.commit_raw_text();
                }
                self.session.stop_japanese_input();
                *self.state = CompositionState::Idle;
                self.host.switch_input_mode(&ids.roman_id);
            }
            InputMode::Japanese => self.host.switch_input_mode(&ids.japanese_id),
        }
    }

    /// Push the current marked text and candidate window to the host and UI.
    pub fn refresh(&mut self) {
        let marked = self.session.current_marked_text(*self.state);
        self.host.set_marked_text(&marked);
        match self.session.candidate_window(*self.state) {
            CandidateWindow::Hidden => self.ui.hide(),
            window => self.ui.show(&window),
        }
    }
}
