/// Arrow-key direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Modifier flags carried alongside every user action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub command: bool,
    pub option: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        command: false,
        option: false,
        shift: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }
}

/// A normalized input event, produced fresh per key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Input(String),
    Backspace,
    Enter,
    Space,
    Escape,
    Unknown,
    SwitchToLatin,
    SwitchToKana,
    Navigate(Direction),
    /// Digit keys 1-9 and 0.
    NumberKey(u8),
}

/// Keyboard input mode of the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    Roman,
    #[default]
    Japanese,
}

/// Instruction for the executor. `Sequence` runs strictly in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    Consume,
    Fallthrough,
    ShowCandidateWindow,
    HideCandidateWindow,
    AppendToMarkedText(String),
    RemoveLastMarkedText,
    CommitMarkedText,
    SubmitSelectedCandidate,
    SelectNextCandidate,
    SelectPrevCandidate,
    SelectNumberCandidate(u8),
    EditSegment(isize),
    EnterCandidateSelectionMode,
    StopComposition,
    SelectInputMode(InputMode),
    Sequence(Vec<ClientAction>),
}
