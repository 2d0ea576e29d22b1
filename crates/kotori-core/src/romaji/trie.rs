use std::collections::BTreeMap;
use std::sync::OnceLock;

use lexime_trie::DoubleArray;

use super::config::{parse_romaji_toml, RomajiConfigError};
use super::table::DEFAULT_TOML;

static CUSTOM_TOML: OnceLock<String> = OnceLock::new();

#[derive(Debug, PartialEq)]
pub enum TrieLookupResult {
    None,
    Prefix,
    Exact(String),
    ExactAndPrefix(String),
}

/// Romaji → kana table on a byte-labelled double-array trie.
pub struct RomajiTrie {
    da: DoubleArray<u8>,
    /// Kana by value id (the romaji key's rank in sorted order).
    kana: Vec<String>,
}

impl RomajiTrie {
    /// Set custom TOML before first `global()` call.
    pub fn init_custom(toml_content: String) -> Result<(), RomajiConfigError> {
        // Validate eagerly
        parse_romaji_toml(&toml_content)?;
        CUSTOM_TOML
            .set(toml_content)
            .map_err(|_| RomajiConfigError::AlreadyInitialized)
    }

    /// Get or initialize the global singleton.
    pub fn global() -> &'static RomajiTrie {
        static INSTANCE: OnceLock<RomajiTrie> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            let toml_str = CUSTOM_TOML
                .get()
                .map(|s| s.as_str())
                .unwrap_or(DEFAULT_TOML);
            let map = parse_romaji_toml(toml_str).expect("romaji TOML must be valid");
            RomajiTrie::from_mappings(&map)
        })
    }

    /// Build from romaji → kana. `BTreeMap` order is the sorted byte order
    /// the double array requires.
    pub fn from_mappings(map: &BTreeMap<String, String>) -> Self {
        let keys: Vec<&[u8]> = map.keys().map(|r| r.as_bytes()).collect();
        RomajiTrie {
            da: DoubleArray::<u8>::build(&keys),
            kana: map.values().cloned().collect(),
        }
    }

    pub fn lookup(&self, romaji: &str) -> TrieLookupResult {
        let probe = self.da.probe(romaji.as_bytes());
        let kana = probe.value.and_then(|id| self.kana.get(id as usize)).cloned();
        match (kana, probe.has_children) {
            (None, false) => TrieLookupResult::None,
            (None, true) => TrieLookupResult::Prefix,
            (Some(kana), false) => TrieLookupResult::Exact(kana),
            (Some(kana), true) => TrieLookupResult::ExactAndPrefix(kana),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vowel_exact() {
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("a"), TrieLookupResult::Exact("あ".into()));
    }

    #[test]
    fn test_prefix_k() {
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("k"), TrieLookupResult::Prefix);
    }

    #[test]
    fn test_symbol_hyphen() {
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("-"), TrieLookupResult::Exact("ー".into()));
    }

    #[test]
    fn test_youon_sha() {
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("sha"), TrieLookupResult::Exact("しゃ".into()));
    }

    #[test]
    fn test_nn_exact() {
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("nn"), TrieLookupResult::Exact("ん".into()));
    }

    #[test]
    fn test_punctuation() {
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("."), TrieLookupResult::Exact("。".into()));
        assert_eq!(trie.lookup(","), TrieLookupResult::Exact("、".into()));
    }

    #[test]
    fn test_z_sequences() {
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("zh"), TrieLookupResult::Exact("←".into()));
        assert_eq!(trie.lookup("z."), TrieLookupResult::Exact("…".into()));
    }

    #[test]
    fn test_none_for_unknown() {
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("xyz"), TrieLookupResult::None);
    }

    #[test]
    fn test_interior_node_is_prefix() {
        let trie = RomajiTrie::global();
        assert_eq!(trie.lookup("ky"), TrieLookupResult::Prefix);
        assert_eq!(trie.lookup("kya"), TrieLookupResult::Exact("きゃ".into()));
    }

    #[test]
    fn test_custom_mappings() {
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), "ア".to_string());
        map.insert("ab".to_string(), "アブ".to_string());
        let trie = RomajiTrie::from_mappings(&map);
        assert_eq!(trie.lookup("a"), TrieLookupResult::ExactAndPrefix("ア".into()));
        assert_eq!(trie.lookup("ab"), TrieLookupResult::Exact("アブ".into()));
        assert_eq!(trie.lookup("b"), TrieLookupResult::None);
    }

    #[test]
    fn test_all_mappings_roundtrip() {
        let trie = RomajiTrie::global();
        let map = parse_romaji_toml(DEFAULT_TOML).unwrap();
        for (romaji, kana) in &map {
            match trie.lookup(romaji) {
                TrieLookupResult::Exact(ref k) | TrieLookupResult::ExactAndPrefix(ref k) => {
                    assert_eq!(k, kana, "mapping mismatch for romaji={romaji}");
                }
                other => panic!("expected Exact/ExactAndPrefix for {romaji}, got {:?}", other),
            }
        }
    }
}
