use std::sync::Arc;

use super::{texts, FailingEngine, Harness};
use crate::action::InputMode;
use crate::keymap::{key, KeyEvent, FLAG_COMMAND};
use crate::session::{CandidateWindow, Dispatch};
use crate::state_machine::CompositionState;
use crate::Modifiers;

#[test]
fn test_type_and_commit_live_conversion() {
    let mut h = Harness::new(true);
    h.type_str("kyou");
    assert_eq!(h.controller.state(), CompositionState::Composing);
    assert_eq!(h.host.marked_text(), "今日");
    assert!(h.ui.window.is_none());

    assert!(h.enter());
    assert_eq!(h.host.committed, "今日");
    assert_eq!(h.controller.state(), CompositionState::Idle);
    assert!(h.host.marked.as_ref().unwrap().is_empty());
}

#[test]
fn test_enter_commits_raw_text_without_live_conversion() {
    let mut h = Harness::new(false);
    h.type_str("kyou");
    assert_eq!(h.host.marked_text(), "きょう");
    assert!(matches!(
        h.ui.window,
        Some(CandidateWindow::Composing { .. })
    ));
    h.enter();
    assert_eq!(h.host.committed, "きょう");
    assert!(h.ui.window.is_none());
}

#[test]
fn test_enter_flushes_trailing_n() {
    let mut h = Harness::new(false);
    h.type_str("hon");
    h.enter();
    assert_eq!(h.host.committed, "ほん");
}

#[test]
fn test_space_selects_and_cycles() {
    let mut h = Harness::new(false);
    h.type_str("kyou");
    h.space();
    assert_eq!(h.controller.state(), CompositionState::Selecting);
    assert_eq!(h.host.marked_text(), "今日");
    match &h.ui.window {
        Some(CandidateWindow::Selecting { selection, .. }) => assert_eq!(*selection, Some(0)),
        other => panic!("expected selecting window, got {other:?}"),
    }

    h.space();
    assert_eq!(h.host.marked_text(), "京");
    h.enter();
    assert_eq!(h.host.committed, "京");
    assert_eq!(h.controller.state(), CompositionState::Idle);
}

#[test]
fn test_bunsetsu_chaining_stays_selecting() {
    let mut h = Harness::new(true);
    h.type_str("kyouha");
    h.space();
    h.enter();
    assert_eq!(h.host.committed, "今日");
    assert_eq!(h.controller.state(), CompositionState::Selecting);
    assert_eq!(h.host.marked_text(), "は");

    h.enter();
    assert_eq!(h.host.committed, "今日は");
    assert_eq!(h.controller.state(), CompositionState::Idle);
}

#[test]
fn test_number_key_picks_candidate() {
    let mut h = Harness::new(true);
    h.type_str("kyou");
    h.space();
    h.type_str("2");
    assert_eq!(h.host.committed, "京");
    assert_eq!(h.controller.state(), CompositionState::Idle);
}

#[test]
fn test_out_of_range_number_keeps_selecting() {
    let mut h = Harness::new(true);
    h.type_str("kyou");
    h.space();
    h.type_str("8");
    assert_eq!(h.host.committed, "");
    assert_eq!(h.controller.state(), CompositionState::Selecting);
}

#[test]
fn test_zero_submits_and_continues_composing() {
    let mut h = Harness::new(true);
    h.type_str("kyou");
    h.space();
    h.type_str("0");
    assert_eq!(h.host.committed, "今日");
    assert_eq!(h.controller.state(), CompositionState::Composing);
    assert_eq!(h.controller.session().raw_text(), "0");
}

#[test]
fn test_typing_in_selection_submits_first() {
    let mut h = Harness::new(true);
    h.type_str("kyou");
    h.space();
    h.type_str("ha");
    assert_eq!(h.host.committed, "今日");
    assert_eq!(h.controller.state(), CompositionState::Composing);
    assert_eq!(h.controller.session().raw_text(), "は");
}

#[test]
fn test_escape_in_composing_discards() {
    let mut h = Harness::new(true);
    h.type_str("kyou");
    assert!(h.press(key::ESCAPE));
    assert_eq!(h.controller.state(), CompositionState::Idle);
    assert_eq!(h.host.committed, "");
    assert!(h.controller.session().is_empty());
    assert!(h.host.marked.as_ref().unwrap().is_empty());
}

#[test]
fn test_escape_in_selecting_returns_to_composing() {
    let mut h = Harness::new(false);
    h.type_str("kyou");
    h.space();
    h.press(key::ESCAPE);
    assert_eq!(h.controller.state(), CompositionState::Composing);
    assert!(h.ui.window.is_none());
    assert_eq!(h.host.marked_text(), "きょう");
}

#[test]
fn test_backspace_to_empty_returns_idle() {
    let mut h = Harness::new(true);
    h.type_str("ka");
    h.press(key::BACKSPACE);
    assert_eq!(h.controller.state(), CompositionState::Idle);
    assert!(h.controller.session().is_empty());
    // Idle backspace belongs to the host.
    assert!(!h.press(key::BACKSPACE));
}

#[test]
fn test_segment_edit_then_submit() {
    let mut h = Harness::new(true);
    h.type_str("kyouha");
    h.press_shift(key::RIGHT);
    assert_eq!(h.controller.state(), CompositionState::Selecting);
    assert_eq!(h.controller.session().cursor(), 1);
    h.press_shift(key::RIGHT);
    h.press_shift(key::RIGHT);
    assert_eq!(h.host.marked_text(), "今日は");
    assert_eq!(
        texts(h.controller.candidate_window_state().candidates()),
        vec!["今日", "京", "きょう", "キョウ"]
    );

    h.enter();
    assert_eq!(h.host.committed, "今日");
    assert_eq!(h.controller.state(), CompositionState::Selecting);
    assert!(!h.controller.session().did_experience_segment_edition());
}

#[test]
fn test_command_key_falls_through() {
    let mut h = Harness::new(true);
    h.type_str("ka");
    let event = KeyEvent::new(0, "c", Modifiers::from_flags(FLAG_COMMAND));
    assert!(!h.send(event));
    assert_eq!(h.controller.state(), CompositionState::Composing);
    assert_eq!(h.controller.session().raw_text(), "か");
}

#[test]
fn test_eisu_commits_and_switches_to_roman() {
    let mut h = Harness::new(false);
    h.type_str("kyou");
    h.press(key::EISU);
    assert_eq!(h.host.committed, "きょう");
    assert_eq!(h.controller.input_mode(), InputMode::Roman);
    assert_eq!(h.controller.state(), CompositionState::Idle);
    let roman_id = h.controller.settings().input_mode.roman_id.clone();
    assert_eq!(h.host.modes.last(), Some(&roman_id));

    // Roman mode passes everything through until kana.
    assert!(!h.send(KeyEvent::text("a")));
    assert!(h.press(key::KANA));
    assert_eq!(h.controller.input_mode(), InputMode::Japanese);
    assert!(h.send(KeyEvent::text("a")));
    assert_eq!(h.controller.session().raw_text(), "あ");
}

#[test]
fn test_eisu_in_selection_commits_remainder() {
    let mut h = Harness::new(true);
    h.type_str("kyouha");
    h.space();
    h.press(key::EISU);
    assert_eq!(h.host.committed, "今日は");
    assert_eq!(h.controller.state(), CompositionState::Idle);
    assert!(h.controller.session().is_empty());
}

#[test]
fn test_surrounding_text_becomes_left_context() {
    let mut h = Harness::new(true);
    h.host.surrounding = Some("私は".to_string());
    h.type_str("ka");
    assert_eq!(h.controller.session().left_context(), Some("私は"));
}

#[test]
fn test_activate_overrides_layout() {
    let mut h = Harness::new(true);
    h.controller.activate(&mut h.host);
    let layout = h.controller.settings().input_mode.keyboard_layout.clone();
    assert_eq!(h.host.layouts, vec![layout]);
}

#[test]
fn test_deactivate_commits_and_resets() {
    let mut h = Harness::new(true);
    h.type_str("kyou");
    h.controller.deactivate(&mut h.host, &mut h.ui);
    assert_eq!(h.host.committed, "今日");
    assert_eq!(h.controller.state(), CompositionState::Idle);
    assert!(h.controller.session().is_empty());
    assert!(h.ui.window.is_none());
}

#[test]
fn test_pointer_choice_submits() {
    let mut h = Harness::new(false);
    h.type_str("kyou");
    let chosen = h.controller.candidate_window_state().candidates()[1].clone();
    h.controller
        .on_candidate_chosen_by_pointer(&chosen, &mut h.host, &mut h.ui);
    assert_eq!(h.host.committed, "京");
    assert_eq!(h.controller.state(), CompositionState::Idle);
}

#[test]
fn test_pointer_selection_updates_marked_text() {
    let mut h = Harness::new(true);
    h.type_str("kyou");
    h.space();
    h.controller
        .on_selection_index_changed_by_pointer(1, &mut h.host, &mut h.ui);
    assert_eq!(h.host.marked_text(), "京");
    h.controller
        .on_selection_index_changed_by_pointer(42, &mut h.host, &mut h.ui);
    assert_eq!(h.controller.candidate_window_state().selection(), Some(3));
}

#[test]
fn test_engine_failure_commits_raw() {
    let mut h = Harness::with_engine(Arc::new(FailingEngine), true);
    h.type_str("kyou");
    assert_eq!(h.host.marked_text(), "きょう");
    h.space();
    assert_eq!(h.controller.state(), CompositionState::Selecting);
    h.enter();
    assert_eq!(h.host.committed, "きょう");
    assert_eq!(h.controller.state(), CompositionState::Idle);
}

#[test]
fn test_deferred_results_refresh_host() {
    let mut h = Harness::new(true);
    h.controller.set_dispatch(Dispatch::Deferred);
    h.type_str("kyou");
    assert_eq!(h.host.marked_text(), "きょう");

    let request = h.controller.take_pending_request().unwrap();
    let engine = super::make_test_engine();
    let result = kotori_core::conversion::ConversionEngine::request_candidates(
        &*engine,
        &request.target,
        &request.options,
    );
    assert!(!h.controller.receive_results(
        request.generation - 1,
        result.clone(),
        &mut h.host,
        &mut h.ui
    ));
    assert!(h
        .controller
        .receive_results(request.generation, result, &mut h.host, &mut h.ui));
    assert_eq!(h.host.marked_text(), "今日");
}

/// Run the pending request against the test engine and hand the result back.
fn deliver_pending(h: &mut Harness) {
    let request = h.controller.take_pending_request().unwrap();
    let engine = super::make_test_engine();
    let result = kotori_core::conversion::ConversionEngine::request_candidates(
        &*engine,
        &request.target,
        &request.options,
    );
    assert!(h
        .controller
        .receive_results(request.generation, result, &mut h.host, &mut h.ui));
}

#[test]
fn test_enter_keeps_live_conversion_with_pending_n() {
    let mut h = Harness::new(true);
    h.type_str("kyoun");
    assert!(h.host.marked_text().starts_with("今日"));
    h.enter();
    assert_eq!(h.host.committed, "今日ん");
}

#[test]
fn test_deferred_enter_keeps_live_conversion_with_pending_n() {
    let mut h = Harness::new(true);
    h.controller.set_dispatch(Dispatch::Deferred);
    h.type_str("kyoun");
    deliver_pending(&mut h);
    assert!(h.host.marked_text().starts_with("今日"));

    h.enter();
    assert_eq!(h.host.committed, "今日ん");
    assert_eq!(h.controller.state(), CompositionState::Idle);
    assert!(h.controller.take_pending_request().is_none());
}

#[test]
fn test_deferred_enter_without_results_commits_kana() {
    let mut h = Harness::new(true);
    h.controller.set_dispatch(Dispatch::Deferred);
    h.type_str("hon");
    h.enter();
    assert_eq!(h.host.committed, "ほん");
}
