use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lexime_trie::DoubleArray;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("empty reading for surfaces {0:?}")]
    EmptyReading(Vec<String>),
}

#[derive(Deserialize)]
struct TableFile {
    entries: HashMap<String, Vec<String>>,
}

/// Reading → surfaces lookup table backing `TableEngine`, indexed by a
/// char-labelled double-array trie.
#[derive(Debug, Clone)]
pub struct ReadingTable {
    trie: DoubleArray<char>,
    /// Surfaces by trie value id (the reading's rank in sorted order).
    surfaces: Vec<Vec<String>>,
}

impl ReadingTable {
    pub fn open(path: &Path) -> Result<Self, DictionaryError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, DictionaryError> {
        let file: TableFile =
            toml::from_str(toml_str).map_err(|e| DictionaryError::Parse(e.to_string()))?;
        if let Some(surfaces) = file.entries.get("") {
            return Err(DictionaryError::EmptyReading(surfaces.clone()));
        }
        Ok(Self::from_entries(file.entries))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        // Sorted by code point, which is the order DoubleArray::build expects.
        let sorted: BTreeMap<Vec<char>, Vec<String>> = entries
            .into_iter()
            .filter(|(reading, surfaces)| !reading.is_empty() && !surfaces.is_empty())
            .map(|(reading, surfaces)| (reading.chars().collect(), surfaces))
            .collect();
        let keys: Vec<&Vec<char>> = sorted.keys().collect();
        let trie = DoubleArray::<char>::build(&keys);
        Self {
            trie,
            surfaces: sorted.into_values().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    pub fn lookup(&self, reading: &str) -> Option<&[String]> {
        let key: Vec<char> = reading.chars().collect();
        let id = self.trie.exact_match(&key)?;
        self.surfaces.get(id as usize).map(Vec::as_slice)
    }

    /// All dictionary prefixes of `chars`, longest first, as (length, surfaces).
    pub fn prefixes<'a>(&'a self, chars: &[char]) -> Vec<(usize, &'a [String])> {
        let mut found: Vec<(usize, &'a [String])> = self
            .trie
            .common_prefix_search(chars)
            .filter_map(|m| {
                let surfaces = self.surfaces.get(m.value_id as usize)?;
                Some((m.len, surfaces.as_slice()))
            })
            .collect();
        found.reverse();
        found
    }
}
