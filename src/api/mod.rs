//! UniFFI export layer: Swift bindings for the Kotori composition session.
//!
//! Each public type here maps to a generated Swift class, struct, or enum.

mod converter;
mod host;
mod session;
mod types;


pub use converter::KotoriConverter;
pub use session::KotoriSession;
pub use types::{
    KotoriCandidate, KotoriCandidateWindow, KotoriConversionResults, KotoriConvertOptions,
    KotoriError, KotoriEvent, KotoriFocus, KotoriKeyResponse, KotoriLearning, KotoriMarkedRun,
    KotoriRomajiConvert, KotoriSegment,
};

use std::path::Path;

use kotori_core::romaji::{self, convert_romaji, RomajiTrie};
use kotori_core::settings;

// ---------------------------------------------------------------------------
// Top-level functions
// ---------------------------------------------------------------------------

#[uniffi::export]
fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[uniffi::export]
fn romaji_convert(kana: String, pending: String, force: bool) -> KotoriRomajiConvert {
    let result = convert_romaji(&kana, &pending, force);
    KotoriRomajiConvert {
        composed_kana: result.composed_kana,
        pending_romaji: result.pending_romaji,
    }
}

fn read_config(path: &str) -> Result<String, KotoriError> {
    std::fs::read_to_string(path).map_err(|e| KotoriError::Io {
        msg: format!("{path}: {e}"),
    })
}

#[uniffi::export]
fn romaji_load_config(path: String) -> Result<(), KotoriError> {
    let content = read_config(&path)?;
    RomajiTrie::init_custom(content).map_err(|e| KotoriError::InvalidData { msg: e.to_string() })
}

#[uniffi::export]
fn settings_load_config(path: String) -> Result<(), KotoriError> {
    let content = read_config(&path)?;
    settings::init_custom(content).map_err(|e| KotoriError::InvalidData { msg: e.to_string() })
}

#[uniffi::export]
fn romaji_default_config() -> String {
    romaji::default_toml().to_string()
}

#[uniffi::export]
fn settings_default_config() -> String {
    settings::default_toml().to_string()
}

#[uniffi::export]
fn keymap_get(key_code: u16, has_shift: bool) -> Option<String> {
    settings::settings()
        .keymap_get(key_code, has_shift)
        .map(|s| s.to_string())
}

#[uniffi::export]
fn trace_init(log_dir: String) {
    crate::trace_init::init_tracing(Path::new(&log_dir));
}
