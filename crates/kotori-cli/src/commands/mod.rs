mod convert_ops;
mod simulate_ops;

pub use convert_ops::convert_cmd;
pub use simulate_ops::{simulate, simulate_cmd, SimStep};

use std::path::Path;
use std::sync::Arc;

use kotori_core::conversion::{DictionaryError, ReadingTable, TableEngine};
use kotori_core::settings::{parse_settings_toml, Settings, SettingsError};

use crate::script::ScriptError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("dictionary: {0}")]
    Dictionary(#[from] DictionaryError),
    #[error("settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("key script: {0}")]
    Script(#[from] ScriptError),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub(crate) fn open_engine(dict_file: &str) -> Result<Arc<TableEngine>, CliError> {
    let table = ReadingTable::open(Path::new(dict_file))?;
    Ok(Arc::new(TableEngine::new(table)))
}

pub(crate) fn load_settings(path: Option<&str>) -> Result<Settings, CliError> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_string(),
        source,
    })?;
    Ok(parse_settings_toml(&content)?)
}
