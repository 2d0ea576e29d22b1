use std::ops::Range;

use kotori_core::conversion::Candidate;

use super::{LastOperation, Session};
use crate::state_machine::CompositionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Focused,
    Unfocused,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedRun {
    pub content: String,
    pub focus: Focus,
}

/// Uncommitted text for the host, split into focus runs.
/// `selection` is in characters of the concatenated runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedText {
    pub runs: Vec<MarkedRun>,
    pub selection: Range<usize>,
}

impl MarkedText {
    pub fn empty() -> Self {
        Self {
            runs: Vec::new(),
            selection: 0..0,
        }
    }

    /// A single unfocused run with the caret at its end.
    pub fn plain(content: String) -> Self {
        if content.is_empty() {
            return Self::empty();
        }
        let end = content.chars().count();
        Self {
            runs: vec![MarkedRun {
                content,
                focus: Focus::None,
            }],
            selection: end..end,
        }
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.content.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.content.is_empty())
    }
}

impl Session {
    /// The top main result while live conversion is displaying it.
    pub fn live_conversion_candidate(&self) -> Option<&Candidate> {
        if self.last_operation == LastOperation::Delete
            || !self.config.live_conversion
            || self.buffer.len() <= 1
        {
            return None;
        }
        self.raw_results.as_ref()?.main.first()
    }

    /// Flush pending romaji and return the text to commit for what the host
    /// is showing, together with the live candidate to learn.
    ///
    /// With deferred dispatch the flush leaves no fresh result, so the
    /// candidate shown before the flush is kept and the flushed kana take the
    /// place of its raw romaji tail.
    pub fn flush_for_commit(&mut self) -> (String, Option<Candidate>) {
        let shown = self.live_conversion_candidate().cloned();
        let tail = self.buffer.pending_romaji_len();
        let start = self.buffer.cursor() - tail;
        let pending: String = self
            .buffer
            .text()
            .chars()
            .skip(start)
            .take(tail)
            .collect();
        self.flush_pending_romaji();

        if let Some(fresh) = self.live_conversion_candidate().cloned() {
            let text = self.current_marked_text(CompositionState::Composing).text();
            return (text, Some(fresh));
        }
        let Some(top) = shown else {
            return (self.buffer.text(), None);
        };
        let text = if top.corresponding_count <= start {
            format!("{}{}", top.text, self.buffer.remainder_after(top.corresponding_count))
        } else {
            match top.text.strip_suffix(pending.as_str()) {
                Some(head) if !pending.is_empty() => {
                    format!("{head}{}", self.buffer.remainder_after(start))
                }
                _ => format!("{}{}", top.text, self.buffer.remainder_after(self.buffer.cursor())),
            }
        };
        (text, Some(top))
    }

    pub fn current_marked_text(&self, state: CompositionState) -> MarkedText {
        match state {
            CompositionState::Idle | CompositionState::Composing => {
                match self.live_conversion_candidate() {
                    Some(top) => MarkedText::plain(format!(
                        "{}{}",
                        top.text,
                        self.buffer.remainder_after(top.corresponding_count)
                    )),
                    None => MarkedText::plain(self.buffer.text()),
                }
            }
            CompositionState::Selecting => {
                let Some(candidate) = self.candidate_for_submit() else {
                    return MarkedText::plain(self.buffer.text());
                };
                let boundary = candidate.text.chars().count();
                let remaining = self.buffer.remainder_after(candidate.corresponding_count);
                let mut runs = vec![MarkedRun {
                    content: candidate.text,
                    focus: Focus::Focused,
                }];
                if !remaining.is_empty() {
                    runs.push(MarkedRun {
                        content: remaining,
                        focus: Focus::Unfocused,
                    });
                }
                MarkedText {
                    runs,
                    selection: boundary..boundary,
                }
            }
        }
    }
}
