use super::trie::{RomajiTrie, TrieLookupResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RomajiConvertResult {
    pub composed_kana: String,
    pub pending_romaji: String,
}

/// Convert pending romaji against the global table.
///
/// When `force` is true, ambiguous sequences are resolved immediately
/// (a trailing "n" becomes "ん", unmatched letters are kept as-is).
pub fn convert_romaji(composed_kana: &str, pending_romaji: &str, force: bool) -> RomajiConvertResult {
    convert_romaji_with(RomajiTrie::global(), composed_kana, pending_romaji, force)
}

pub fn convert_romaji_with(
    trie: &RomajiTrie,
    composed_kana: &str,
    pending_romaji: &str,
    force: bool,
) -> RomajiConvertResult {
    let mut drain = Drain {
        trie,
        composed: composed_kana.to_string(),
        pending: pending_romaji.to_string(),
        force,
    };
    while !drain.pending.is_empty() && drain.step() {}

    if drain.composed.chars().any(|c| c.is_ascii_lowercase()) {
        drain.composed = collapse_latin_kana(&drain.composed, trie);
    }

    RomajiConvertResult {
        composed_kana: drain.composed,
        pending_romaji: drain.pending,
    }
}

struct Drain<'a> {
    trie: &'a RomajiTrie,
    composed: String,
    pending: String,
    force: bool,
}

impl Drain<'_> {
    /// Consume as much of `pending` as one lookup allows. Returns false once stuck.
    fn step(&mut self) -> bool {
        match self.trie.lookup(&self.pending) {
            TrieLookupResult::Exact(kana) => self.emit_all(&kana),
            // Wait for a longer match unless forced.
            TrieLookupResult::ExactAndPrefix(kana) if self.force => self.emit_all(&kana),
            TrieLookupResult::ExactAndPrefix(_) => false,
            TrieLookupResult::Prefix if !self.force => false,
            TrieLookupResult::Prefix | TrieLookupResult::None => self.resolve_unmatched(),
        }
    }

    fn emit_all(&mut self, kana: &str) -> bool {
        self.composed.push_str(kana);
        self.pending.clear();
        true
    }

    /// The whole pending sequence has no match: try the longest matching
    /// sub-prefix, then sokuon / hatsuon, then (when forced) drain one char.
    fn resolve_unmatched(&mut self) -> bool {
        // Sub-prefixes are consumed even when ExactAndPrefix: the full sequence
        // already failed, so no longer match can arrive.
        for len in (1..self.pending.len()).rev() {
            if !self.pending.is_char_boundary(len) {
                continue;
            }
            match self.trie.lookup(&self.pending[..len]) {
                TrieLookupResult::Exact(kana) | TrieLookupResult::ExactAndPrefix(kana) => {
                    self.composed.push_str(&kana);
                    self.pending.drain(..len);
                    return true;
                }
                _ => {}
            }
        }

        let mut chars = self.pending.chars();
        let (Some(first), second) = (chars.next(), chars.next()) else {
            return false;
        };

        match second {
            Some(second) if first == second && first != 'n' && !is_vowel(first) => {
                self.composed.push('っ');
                self.pending.remove(0);
                true
            }
            Some(second) if first == 'n' && !is_vowel(second) && !matches!(second, 'n' | 'y') => {
                self.composed.push('ん');
                self.pending.remove(0);
                true
            }
            Some(_) if self.force => {
                let c = self.pending.remove(0);
                self.composed.push(c);
                true
            }
            Some(_) => false,
            None if self.pending == "n" => {
                if self.force {
                    self.composed.push('ん');
                    self.pending.clear();
                    true
                } else {
                    false
                }
            }
            None => {
                // Unrecognized single char: keep it in the composed text.
                let rest = std::mem::take(&mut self.pending);
                self.composed.push_str(&rest);
                true
            }
        }
    }
}

fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'i' | 'u' | 'e' | 'o')
}

fn kana_vowel_to_romaji(ch: char) -> Option<char> {
    match ch {
        'あ' => Some('a'),
        'い' => Some('i'),
        'う' => Some('u'),
        'え' => Some('e'),
        'お' => Some('o'),
        _ => None,
    }
}

/// Collapse latin consonant(s) followed by a kana vowel into a single kana,
/// e.g. "kあ" → "か", "shあ" → "しゃ".
fn collapse_latin_kana(input: &str, trie: &RomajiTrie) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut result = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_ascii_lowercase() {
            result.push(chars[i]);
            i += 1;
            continue;
        }
        let run_end = chars[i..]
            .iter()
            .position(|c| !c.is_ascii_lowercase())
            .map_or(chars.len(), |p| i + p);
        let vowel = chars.get(run_end).copied().and_then(kana_vowel_to_romaji);
        if let Some(vowel) = vowel {
            let mut key: String = chars[i..run_end].iter().collect();
            key.push(vowel);
            if let TrieLookupResult::Exact(kana) | TrieLookupResult::ExactAndPrefix(kana) =
                trie.lookup(&key)
            {
                result.push_str(&kana);
                i = run_end + 1;
                continue;
            }
        }
        result.push(chars[i]);
        i += 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(kana: &str, pending: &str, force: bool) -> (String, String) {
        let r = convert_romaji(kana, pending, force);
        (r.composed_kana, r.pending_romaji)
    }

    #[test]
    fn basic_syllables() {
        assert_eq!(convert("", "ka", false), ("か".into(), "".into()));
        assert_eq!(convert("", "kakiku", false), ("かきく".into(), "".into()));
        assert_eq!(convert("", "kyouha", false), ("きょうは".into(), "".into()));
        assert_eq!(convert("あ", "ka", false), ("あか".into(), "".into()));
    }

    #[test]
    fn sokuon_and_hatsuon() {
        assert_eq!(convert("", "kk", false), ("っ".into(), "k".into()));
        assert_eq!(convert("", "kka", false), ("っか".into(), "".into()));
        assert_eq!(convert("", "nk", false), ("ん".into(), "k".into()));
    }

    #[test]
    fn trailing_n_waits_unless_forced() {
        assert_eq!(convert("", "n", false), ("".into(), "n".into()));
        assert_eq!(convert("", "n", true), ("ん".into(), "".into()));
    }

    #[test]
    fn incomplete_sequences() {
        assert_eq!(convert("", "chy", false), ("".into(), "chy".into()));
        assert_eq!(convert("", "chy", true), ("chy".into(), "".into()));
        assert_eq!(convert("", "tc", false), ("".into(), "tc".into()));
    }

    #[test]
    fn collapse_latin_before_kana_vowel() {
        assert_eq!(convert("kあ", "", false).0, "か");
        assert_eq!(convert("あkい", "", false).0, "あき");
        assert_eq!(convert("shあ", "", false).0, "しゃ");
        assert_eq!(convert("kが", "", false).0, "kが");
    }
}
