//! The composition state machine: `(state, modifiers, action) → (state', client action)`.
//!
//! Pure and total. The executor may still move the state afterwards when an
//! effect decides it (e.g. a submit that empties the buffer ends in `Idle`).

use crate::action::{ClientAction, Direction, InputMode, Modifiers, UserAction};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompositionState {
    #[default]
    Idle,
    Composing,
    Selecting,
}

pub fn transition(
    state: CompositionState,
    modifiers: Modifiers,
    action: &UserAction,
) -> (CompositionState, ClientAction) {
    if modifiers.command {
        return (state, ClientAction::Fallthrough);
    }
    if modifiers.option && !matches!(action, UserAction::Input(_)) {
        return (state, ClientAction::Fallthrough);
    }
    match state {
        CompositionState::Idle => idle(action),
        CompositionState::Composing => composing(modifiers, action),
        CompositionState::Selecting => selecting(modifiers, action),
    }
}

fn digit_text(n: u8) -> String {
    char::from_digit(u32::from(n % 10), 10)
        .unwrap_or('0')
        .to_string()
}

fn idle(action: &UserAction) -> (CompositionState, ClientAction) {
    use CompositionState::*;
    match action {
        UserAction::Input(text) => (Composing, ClientAction::AppendToMarkedText(text.clone())),
        UserAction::NumberKey(n) => (Composing, ClientAction::AppendToMarkedText(digit_text(*n))),
        UserAction::SwitchToKana => (Idle, ClientAction::SelectInputMode(InputMode::Japanese)),
        UserAction::SwitchToLatin => (Idle, ClientAction::SelectInputMode(InputMode::Roman)),
        UserAction::Unknown
        | UserAction::Navigate(_)
        | UserAction::Space
        | UserAction::Backspace
        | UserAction::Enter
        | UserAction::Escape => (Idle, ClientAction::Fallthrough),
    }
}

fn composing(modifiers: Modifiers, action: &UserAction) -> (CompositionState, ClientAction) {
    use CompositionState::*;
    match action {
        UserAction::Input(text) => (Composing, ClientAction::AppendToMarkedText(text.clone())),
        UserAction::NumberKey(n) => (Composing, ClientAction::AppendToMarkedText(digit_text(*n))),
        UserAction::Backspace => (Composing, ClientAction::RemoveLastMarkedText),
        UserAction::Enter => (Idle, ClientAction::CommitMarkedText),
        UserAction::Escape => (Idle, ClientAction::StopComposition),
        UserAction::Space => (Selecting, ClientAction::EnterCandidateSelectionMode),
        UserAction::SwitchToKana => (
            Composing,
            ClientAction::SelectInputMode(InputMode::Japanese),
        ),
        UserAction::SwitchToLatin => (
            Idle,
            ClientAction::Sequence(vec![
                ClientAction::CommitMarkedText,
                ClientAction::SelectInputMode(InputMode::Roman),
            ]),
        ),
        UserAction::Navigate(Direction::Down) => {
            (Selecting, ClientAction::EnterCandidateSelectionMode)
        }
        UserAction::Navigate(Direction::Right) if modifiers.shift => {
            (Selecting, ClientAction::EditSegment(1))
        }
        UserAction::Navigate(Direction::Left) if modifiers.shift => {
            (Selecting, ClientAction::EditSegment(-1))
        }
        UserAction::Navigate(_) => (Composing, ClientAction::Consume),
        UserAction::Unknown => (Composing, ClientAction::Fallthrough),
    }
}

fn selecting(modifiers: Modifiers, action: &UserAction) -> (CompositionState, ClientAction) {
    use CompositionState::*;
    match action {
        UserAction::Input(text) => (
            Composing,
            ClientAction::Sequence(vec![
                ClientAction::SubmitSelectedCandidate,
                ClientAction::AppendToMarkedText(text.clone()),
            ]),
        ),
        UserAction::Enter => (Idle, ClientAction::SubmitSelectedCandidate),
        UserAction::Backspace => (Composing, ClientAction::RemoveLastMarkedText),
        UserAction::Escape => (Composing, ClientAction::HideCandidateWindow),
        UserAction::Space if modifiers.shift => (Selecting, ClientAction::SelectPrevCandidate),
        UserAction::Space => (Selecting, ClientAction::SelectNextCandidate),
        UserAction::Navigate(Direction::Right) if modifiers.shift => {
            (Selecting, ClientAction::EditSegment(1))
        }
        UserAction::Navigate(Direction::Right) => (Idle, ClientAction::SubmitSelectedCandidate),
        UserAction::Navigate(Direction::Left) if modifiers.shift => {
            (Selecting, ClientAction::EditSegment(-1))
        }
        UserAction::Navigate(Direction::Down) => (Selecting, ClientAction::SelectNextCandidate),
        UserAction::Navigate(Direction::Up) => (Selecting, ClientAction::SelectPrevCandidate),
        UserAction::Navigate(Direction::Left) => (Selecting, ClientAction::Consume),
        UserAction::NumberKey(0) => (
            Composing,
            ClientAction::Sequence(vec![
                ClientAction::SubmitSelectedCandidate,
                ClientAction::AppendToMarkedText("0".to_string()),
            ]),
        ),
        UserAction::NumberKey(n) => (Idle, ClientAction::SelectNumberCandidate(*n)),
        UserAction::SwitchToKana => (
            Selecting,
            ClientAction::SelectInputMode(InputMode::Japanese),
        ),
        UserAction::SwitchToLatin => (
            Idle,
            ClientAction::Sequence(vec![
                ClientAction::SubmitSelectedCandidate,
                ClientAction::SelectInputMode(InputMode::Roman),
            ]),
        ),
        UserAction::Unknown => (Selecting, ClientAction::Fallthrough),
    }
}
