use std::sync::Arc;

use tracing::{debug, debug_span};

use kotori_core::conversion::{Candidate, ConversionEngine, ConversionError, ConversionResults};
use kotori_core::settings::Settings;

use crate::action::{InputMode, UserAction};
use crate::executor::{ActionExecutor, CandidateUi, HostClient};
use crate::keymap::{user_action, KeyEvent};
use crate::session::{CandidateWindow, ConversionRequest, Dispatch, MarkedText, Session, SessionConfig};
use crate::state_machine::{transition, CompositionState};

/// One input context: session, composition state and input mode.
pub struct InputController {
    session: Session,
    state: CompositionState,
    mode: InputMode,
    settings: Settings,
}

impl InputController {
    pub fn new(engine: Arc<dyn ConversionEngine>, settings: Settings) -> Self {
        let session = Session::new(engine, SessionConfig::from(&settings));
        Self {
            session,
            state: CompositionState::Idle,
            mode: InputMode::Japanese,
            settings,
        }
    }

    pub fn set_dispatch(&mut self, dispatch: Dispatch) {
        self.session.set_dispatch(dispatch);
    }

    pub fn state(&self) -> CompositionState {
        self.state
    }

    pub fn input_mode(&self) -> InputMode {
        self.mode
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn executor<'a>(
        &'a mut self,
        host: &'a mut dyn HostClient,
        ui: &'a mut dyn CandidateUi,
    ) -> ActionExecutor<'a> {
        ActionExecutor {
            session: &mut self.session,
            state: &mut self.state,
            mode: &mut self.mode,
            settings: &self.settings,
            host,
            ui,
        }
    }

    pub fn activate(&mut self, host: &mut dyn HostClient) {
        host.override_keyboard_layout(&self.settings.input_mode.keyboard_layout);
    }

    /// Commit whatever is on screen and reset the session and engine.
    pub fn deactivate(&mut self, host: &mut dyn HostClient, ui: &mut dyn CandidateUi) {
        if !self.session.is_empty() {
            let text = self.session.current_marked_text(self.state).text();
            if !text.is_empty() {
                host.insert_text(&text);
            }
        }
        self.session.deactivate();
        self.state = CompositionState::Idle;
        host.set_marked_text(&MarkedText::empty());
        ui.hide();
    }

    /// Handle one key event. Returns whether it was consumed.
    pub fn handle_event(
        &mut self,
        event: &KeyEvent,
        host: &mut dyn HostClient,
        ui: &mut dyn CandidateUi,
    ) -> bool {
        let _span = debug_span!("handle_event", key_code = event.key_code).entered();
        let action = user_action(event, &self.settings);
        if self.mode == InputMode::Roman
            && self.state == CompositionState::Idle
            && action != UserAction::SwitchToKana
        {
            return false;
        }
        let (next, client_action) = transition(self.state, event.modifiers, &action);
        debug!(from = ?self.state, to = ?next, ?action, ?client_action, "transition");
        self.state = next;
        self.executor(host, ui).run(&client_action)
    }

    pub fn on_candidate_chosen_by_pointer(
        &mut self,
        candidate: &Candidate,
        host: &mut dyn HostClient,
        ui: &mut dyn CandidateUi,
    ) {
        if self.session.is_empty() {
            return;
        }
        let mut executor = self.executor(host, ui);
        executor.submit(candidate);
        executor.refresh();
    }

    pub fn on_selection_index_changed_by_pointer(
        &mut self,
        index: usize,
        host: &mut dyn HostClient,
        ui: &mut dyn CandidateUi,
    ) {
        self.session.set_selection_index(index);
        self.executor(host, ui).refresh();
    }

    /// Deliver deferred conversion results. Stale generations are ignored.
    pub fn receive_results(
        &mut self,
        generation: u64,
        result: Result<ConversionResults, ConversionError>,
        host: &mut dyn HostClient,
        ui: &mut dyn CandidateUi,
    ) -> bool {
        if !self.session.receive_results(generation, result) {
            return false;
        }
        self.executor(host, ui).refresh();
        true
    }

    pub fn candidate_window_state(&self) -> CandidateWindow {
        self.session.candidate_window(self.state)
    }

    pub fn current_marked_text(&self) -> MarkedText {
        self.session.current_marked_text(self.state)
    }

    pub fn take_pending_request(&mut self) -> Option<ConversionRequest> {
        self.session.take_pending_request()
    }
}
