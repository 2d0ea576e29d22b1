//! The composing buffer: raw input so far plus a cursor.
//!
//! Positions are counted in buffer units (one `char` of the convert target),
//! which is also the unit of `Candidate::corresponding_count`. Romaji typed
//! at the cursor is converted to kana as it arrives; letters that do not yet
//! form a kana stay in the buffer as pending romaji until flushed.

use crate::romaji::convert_romaji;
use crate::unicode::is_pending_romaji;


#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposingText {
    chars: Vec<char>,
    cursor: usize,
}

impl ComposingText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor == self.chars.len()
    }

    /// The whole convert target.
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Text before the cursor: the part that is currently being converted.
    pub fn prefix_to_cursor(&self) -> String {
        self.chars[..self.cursor].iter().collect()
    }

    /// Text left after completing the first `count` units.
    pub fn remainder_after(&self, count: usize) -> String {
        self.chars[count.min(self.chars.len())..].iter().collect()
    }

    pub fn insert_at_cursor(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let romaji = text.chars().all(|c| c.is_ascii() && !c.is_ascii_uppercase());
        if !romaji {
            self.splice_before_cursor(0, text.chars());
            return;
        }
        let tail = self.pending_romaji_len();
        let mut pending: String = self.chars[self.cursor - tail..self.cursor].iter().collect();
        pending.push_str(text);
        let converted = convert_romaji("", &pending, false);
        let replacement = converted.composed_kana + &converted.pending_romaji;
        self.splice_before_cursor(tail, replacement.chars());
    }

    /// Delete up to `count` units before the cursor. Returns how many were removed.
    pub fn delete_backward(&mut self, count: usize) -> usize {
        let removed = count.min(self.cursor);
        self.chars.drain(self.cursor - removed..self.cursor);
        self.cursor -= removed;
        removed
    }

    /// Move the cursor by `delta`, clamped to the buffer. Returns the applied motion.
    pub fn move_cursor(&mut self, delta: isize) -> isize {
        let target = (self.cursor as isize + delta).clamp(0, self.chars.len() as isize);
        let moved = target - self.cursor as isize;
        self.cursor = target as usize;
        moved
    }

    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = position.min(self.chars.len());
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Drop the first `count` units, keeping the rest pending.
    pub fn prefix_complete(&mut self, count: usize) {
        let count = count.min(self.chars.len());
        self.chars.drain(..count);
        self.cursor = self.cursor.saturating_sub(count);
    }

    /// Resolve pending romaji before the cursor, e.g. a trailing "n" becomes "ん".
    pub fn flush_romaji(&mut self) {
        let tail = self.pending_romaji_len();
        if tail == 0 {
            return;
        }
        let pending: String = self.chars[self.cursor - tail..self.cursor].iter().collect();
        let converted = convert_romaji("", &pending, true);
        let replacement = converted.composed_kana + &converted.pending_romaji;
        self.splice_before_cursor(tail, replacement.chars());
    }

    /// Number of pending romaji letters directly before the cursor.
    pub fn pending_romaji_len(&self) -> usize {
        self.chars[..self.cursor]
            .iter()
            .rev()
            .take_while(|c| is_pending_romaji(**c))
            .count()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    /// Replace the `replace` units before the cursor with `with`, leaving the
    /// cursor after the inserted text.
    fn splice_before_cursor(&mut self, replace: usize, with: impl Iterator<Item = char>) {
        let start = self.cursor - replace;
        let before = self.chars.len();
        self.chars.splice(start..self.cursor, with);
        let inserted = self.chars.len() + replace - before;
        self.cursor = start + inserted;
    }
}
