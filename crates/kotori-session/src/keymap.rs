//! Key event → `UserAction` adapter.

use kotori_core::settings::Settings;

use crate::action::{Direction, Modifiers, UserAction};

// macOS virtual key codes
pub mod key {
    pub const ENTER: u16 = 36;
    pub const TAB: u16 = 48;
    pub const SPACE: u16 = 49;
    pub const BACKSPACE: u16 = 51;
    pub const ESCAPE: u16 = 53;
    pub const NUMPAD_ENTER: u16 = 76;
    pub const EISU: u16 = 102;
    pub const KANA: u16 = 104;
    pub const LEFT: u16 = 123;
    pub const RIGHT: u16 = 124;
    pub const DOWN: u16 = 125;
    pub const UP: u16 = 126;
}

// Flag bits accepted from the host
pub const FLAG_SHIFT: u8 = 1;
pub const FLAG_OPTION: u8 = 2;
pub const FLAG_COMMAND: u8 = 4;

impl Modifiers {
    pub fn from_flags(flags: u8) -> Self {
        Self {
            command: flags & FLAG_COMMAND != 0,
            option: flags & FLAG_OPTION != 0,
            shift: flags & FLAG_SHIFT != 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: u16,
    /// Characters the key produced, as reported by the host.
    pub text: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key_code: u16, text: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key_code,
            text: text.into(),
            modifiers,
        }
    }

    /// A printable key with no special key code.
    pub fn text(text: &str) -> Self {
        Self::new(0, text, Modifiers::NONE)
    }

    pub fn key(key_code: u16) -> Self {
        Self::new(key_code, "", Modifiers::NONE)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

pub fn user_action(event: &KeyEvent, settings: &Settings) -> UserAction {
    match event.key_code {
        key::ENTER | key::NUMPAD_ENTER => UserAction::Enter,
        key::TAB => UserAction::Unknown,
        key::SPACE => UserAction::Space,
        key::BACKSPACE => UserAction::Backspace,
        key::ESCAPE => UserAction::Escape,
        key::EISU => UserAction::SwitchToLatin,
        key::KANA => UserAction::SwitchToKana,
        key::LEFT => UserAction::Navigate(Direction::Left),
        key::RIGHT => UserAction::Navigate(Direction::Right),
        key::DOWN => UserAction::Navigate(Direction::Down),
        key::UP => UserAction::Navigate(Direction::Up),
        code => {
            if let Some(text) = settings.keymap_get(code, event.modifiers.shift) {
                return UserAction::Input(text.to_string());
            }
            text_action(&event.text)
        }
    }
}

fn text_action(text: &str) -> UserAction {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_digit() => {
            UserAction::NumberKey(c.to_digit(10).map_or(0, |d| d as u8))
        }
        (Some(_), _) if text.chars().all(|c| !c.is_control()) => {
            UserAction::Input(text.to_string())
        }
        _ => UserAction::Unknown,
    }
}
