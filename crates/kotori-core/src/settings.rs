//! Settings loaded from TOML.
//!
//! - `init_custom(toml_content)` sets a custom TOML before first `settings()` call
//! - `settings()` returns `&'static Settings` (lazy-init singleton)
//! - `parse_settings_toml` builds an owned `Settings` for per-session injection
//! - Default values are embedded via `include_str!("default_settings.toml")`

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

/// Set custom TOML before first `settings()` call.
pub fn init_custom(toml_content: String) -> Result<(), SettingsError> {
    parse_settings_toml(&toml_content)?;
    CUSTOM_TOML
        .set(toml_content)
        .map_err(|_| SettingsError::AlreadyInitialized)
}

/// Get or initialize the global settings singleton.
pub fn settings() -> &'static Settings {
    static INSTANCE: OnceLock<Settings> = OnceLock::new();
    INSTANCE.get_or_init(|| {
        let toml_str = CUSTOM_TOML
            .get()
            .map(|s| s.as_str())
            .unwrap_or(DEFAULT_SETTINGS_TOML);
        parse_settings_toml(toml_str).expect("settings TOML must be valid")
    })
}

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("settings already initialized")]
    AlreadyInitialized,
}

/// How much the conversion engine may learn from committed candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningPolicy {
    #[default]
    InputAndOutput,
    OnlyOutput,
    Nothing,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub conversion: ConversionSettings,
    #[serde(default)]
    pub debug: DebugSettings,
    pub input_mode: InputModeSettings,
    #[serde(default)]
    keymap: HashMap<String, Vec<String>>,
    /// Parsed keymap: key_code → (normal, shifted).
    #[serde(skip)]
    keymap_parsed: Vec<(u16, String, String)>,
}

impl Settings {
    /// Look up a remapped key by key_code and shift state.
    pub fn keymap_get(&self, key_code: u16, has_shift: bool) -> Option<&str> {
        self.keymap_parsed
            .iter()
            .find(|(code, _, _)| *code == key_code)
            .map(|(_, normal, shifted)| {
                if has_shift {
                    shifted.as_str()
                } else {
                    normal.as_str()
                }
            })
    }
}

impl Default for Settings {
    fn default() -> Self {
        settings().clone()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConversionSettings {
    pub live_conversion: bool,
    pub english_conversion: bool,
    #[serde(default)]
    pub learning: LearningPolicy,
    pub max_candidates: usize,
    pub left_context_chars: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DebugSettings {
    #[serde(default)]
    pub candidate_window: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputModeSettings {
    pub roman_id: String,
    pub japanese_id: String,
    pub keyboard_layout: String,
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let mut s: Settings =
        toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    s.keymap_parsed = parse_keymap(&s.keymap)?;
    Ok(s)
}

fn parse_keymap(
    raw: &HashMap<String, Vec<String>>,
) -> Result<Vec<(u16, String, String)>, SettingsError> {
    let mut result = Vec::with_capacity(raw.len());
    for (key_str, values) in raw {
        let key_code: u16 = key_str.parse().map_err(|_| SettingsError::InvalidValue {
            field: format!("keymap.{key_str}"),
            reason: "key_code must be a u16 integer".to_string(),
        })?;
        let [normal, shifted] = values.as_slice() else {
            return Err(SettingsError::InvalidValue {
                field: format!("keymap.{key_str}"),
                reason: "value must be [\"normal\", \"shifted\"]".to_string(),
            });
        };
        result.push((key_code, normal.clone(), shifted.clone()));
    }
    Ok(result)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    if s.conversion.max_candidates == 0 {
        return Err(SettingsError::InvalidValue {
            field: "conversion.max_candidates".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    for (field, value) in [
        ("input_mode.roman_id", &s.input_mode.roman_id),
        ("input_mode.japanese_id", &s.input_mode.japanese_id),
    ] {
        if value.is_empty() {
            return Err(SettingsError::InvalidValue {
                field: field.to_string(),
                reason: "must not be empty".to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_toml() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert!(s.conversion.live_conversion);
        assert!(!s.conversion.english_conversion);
        assert_eq!(s.conversion.learning, LearningPolicy::InputAndOutput);
        assert_eq!(s.conversion.max_candidates, 30);
        assert!(!s.debug.candidate_window);
    }

    #[test]
    fn keymap_lookup() {
        let s = parse_settings_toml(DEFAULT_SETTINGS_TOML).unwrap();
        assert_eq!(s.keymap_get(93, false), Some("\\"));
        assert_eq!(s.keymap_get(93, true), Some("|"));
        assert_eq!(s.keymap_get(0, false), None);
    }

    #[test]
    fn learning_policy_names() {
        let toml = DEFAULT_SETTINGS_TOML.replace("\"input_and_output\"", "\"only_output\"");
        let s = parse_settings_toml(&toml).unwrap();
        assert_eq!(s.conversion.learning, LearningPolicy::OnlyOutput);

        let toml = DEFAULT_SETTINGS_TOML.replace("\"input_and_output\"", "\"sometimes\"");
        assert!(matches!(
            parse_settings_toml(&toml).unwrap_err(),
            SettingsError::Parse(_)
        ));
    }

    #[test]
    fn reject_zero_max_candidates() {
        let toml = DEFAULT_SETTINGS_TOML.replace("max_candidates = 30", "max_candidates = 0");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(
            matches!(err, SettingsError::InvalidValue { ref field, .. } if field == "conversion.max_candidates")
        );
    }

    #[test]
    fn reject_malformed_keymap() {
        let toml = DEFAULT_SETTINGS_TOML.replace("93 = [\"\\\\\", \"|\"]", "93 = [\"only-one\"]");
        let err = parse_settings_toml(&toml).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { .. }));
    }

    #[test]
    fn missing_debug_section_defaults() {
        let toml = DEFAULT_SETTINGS_TOML.replace("[debug]", "[debug_unused]");
        let s = parse_settings_toml(&toml).unwrap();
        assert!(!s.debug.candidate_window);
    }

    #[test]
    fn load_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        let toml = DEFAULT_SETTINGS_TOML.replace("live_conversion = true", "live_conversion = false");
        file.write_all(toml.as_bytes()).unwrap();
        let content = std::fs::read_to_string(file.path()).unwrap();
        let s = parse_settings_toml(&content).unwrap();
        assert!(!s.conversion.live_conversion);
    }
}
