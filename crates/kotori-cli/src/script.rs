//! Key scripts: `kyouha<space><S-right><enter>`.
//!
//! Plain characters are typed as text. `<name>` names a special key, with
//! optional `S-` (shift), `O-` (option) and `C-` (command) prefixes, which
//! also apply to single characters (`<C-c>`). `<lt>` types a literal `<`.

use kotori_session::keymap::key;
use kotori_session::{KeyEvent, Modifiers};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unterminated key name at offset {0}")]
    Unterminated(usize),
    #[error("unknown key name: <{0}>")]
    UnknownKey(String),
}

/// A parsed key with the label it was written as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptKey {
    pub label: String,
    pub event: KeyEvent,
}

pub fn parse_script(script: &str) -> Result<Vec<ScriptKey>, ScriptError> {
    let mut keys = Vec::new();
    let mut rest = script;
    let mut offset = 0;
    while let Some(c) = rest.chars().next() {
        if c == '<' {
            let end = rest.find('>').ok_or(ScriptError::Unterminated(offset))?;
            let name = &rest[1..end];
            keys.push(ScriptKey {
                label: format!("<{name}>"),
                event: named_key(name)?,
            });
            rest = &rest[end + 1..];
            offset += end + 1;
        } else {
            keys.push(ScriptKey {
                label: c.to_string(),
                event: KeyEvent::text(&c.to_string()),
            });
            rest = &rest[c.len_utf8()..];
            offset += c.len_utf8();
        }
    }
    Ok(keys)
}

fn named_key(name: &str) -> Result<KeyEvent, ScriptError> {
    let mut modifiers = Modifiers::NONE;
    let mut base = name;
    loop {
        if let Some(r) = base.strip_prefix("S-") {
            modifiers.shift = true;
            base = r;
        } else if let Some(r) = base.strip_prefix("O-") {
            modifiers.option = true;
            base = r;
        } else if let Some(r) = base.strip_prefix("C-") {
            modifiers.command = true;
            base = r;
        } else {
            break;
        }
    }
    let event = match base {
        "space" => KeyEvent::new(key::SPACE, " ", modifiers),
        "enter" | "ret" => KeyEvent::key(key::ENTER),
        "tab" => KeyEvent::key(key::TAB),
        "bs" | "backspace" => KeyEvent::key(key::BACKSPACE),
        "esc" | "escape" => KeyEvent::key(key::ESCAPE),
        "left" => KeyEvent::key(key::LEFT),
        "right" => KeyEvent::key(key::RIGHT),
        "up" => KeyEvent::key(key::UP),
        "down" => KeyEvent::key(key::DOWN),
        "eisu" => KeyEvent::key(key::EISU),
        "kana" => KeyEvent::key(key::KANA),
        "lt" => KeyEvent::text("<"),
        other if other.chars().count() == 1 => KeyEvent::text(other),
        other => return Err(ScriptError::UnknownKey(other.to_string())),
    };
    Ok(event.with_modifiers(modifiers))
}
