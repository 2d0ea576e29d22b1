//! Romaji table loading.
//!
//! Keys are folded to lowercase: the composing buffer only ever holds
//! lowercase pending romaji, so an uppercase key could never match.

use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error)]
pub enum RomajiConfigError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("[mappings] table is empty")]
    Empty,
    #[error("romaji key must be ASCII: {0:?}")]
    NonAsciiKey(String),
    #[error("kana for {0:?} is empty")]
    EmptyValue(String),
    #[error("{0:?} appears twice after case folding")]
    DuplicateKey(String),
    #[error("romaji table already initialized")]
    AlreadyInitialized,
}

struct TableFile {
    mappings: Vec<(String, String)>,
}

/// Parse a `[mappings]` table into romaji → kana, keys lowercased.
pub fn parse_romaji_toml(toml_str: &str) -> Result<BTreeMap<String, String>, RomajiConfigError> {
    let raw: toml::Table =
        toml::from_str(toml_str).map_err(|e| RomajiConfigError::Parse(e.to_string()))?;
    let file = TableFile::from_table(raw)?;
    if file.mappings.is_empty() {
        return Err(RomajiConfigError::Empty);
    }

    let mut out = BTreeMap::new();
    for (key, kana) in file.mappings {
        if key.is_empty() || !key.is_ascii() {
            return Err(RomajiConfigError::NonAsciiKey(key));
        }
        if kana.is_empty() {
            return Err(RomajiConfigError::EmptyValue(key));
        }
        let folded = key.to_ascii_lowercase();
        if out.insert(folded.clone(), kana).is_some() {
            return Err(RomajiConfigError::DuplicateKey(folded));
        }
    }
    Ok(out)
}

impl TableFile {
    fn from_table(mut raw: toml::Table) -> Result<Self, RomajiConfigError> {
        let Some(toml::Value::Table(mappings)) = raw.remove("mappings") else {
            return Err(RomajiConfigError::Parse("missing [mappings] table".into()));
        };
        let mappings = mappings
            .into_iter()
            .map(|(k, v)| match v {
                toml::Value::String(kana) => Ok((k, kana)),
                other => Err(RomajiConfigError::Parse(format!(
                    "{k}: expected a string, found {}",
                    other.type_str()
                ))),
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { mappings })
    }
}
