use std::collections::HashSet;

use kotori_core::conversion::{Candidate, ConversionResults};

use super::Session;
use crate::state_machine::CompositionState;

/// Candidates shown per page; number keys pick within the current page.
pub const PAGE_SIZE: usize = 9;

/// What the candidate window should display.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateWindow {
    Hidden,
    Composing {
        candidates: Vec<Candidate>,
        selection: Option<usize>,
    },
    Selecting {
        candidates: Vec<Candidate>,
        selection: Option<usize>,
    },
}

impl CandidateWindow {
    pub fn is_hidden(&self) -> bool {
        matches!(self, CandidateWindow::Hidden)
    }

    pub fn candidates(&self) -> &[Candidate] {
        match self {
            CandidateWindow::Hidden => &[],
            CandidateWindow::Composing { candidates, .. }
            | CandidateWindow::Selecting { candidates, .. } => candidates,
        }
    }

    pub fn selection(&self) -> Option<usize> {
        match self {
            CandidateWindow::Hidden => None,
            CandidateWindow::Composing { selection, .. }
            | CandidateWindow::Selecting { selection, .. } => *selection,
        }
    }
}

/// Merge first-clause and main results into the displayed list.
///
/// After a segment edit only main results are used. Otherwise, when the
/// longest first-clause candidate already spans as much as the main ones,
/// main results are shown as is; else first-clause candidates come first,
/// followed by main candidates whose text is not already listed.
pub fn derive_candidates(results: &ConversionResults, segment_edited: bool) -> Vec<Candidate> {
    if segment_edited || results.max_first_clause_count() == results.max_main_count() {
        return results.main.clone();
    }
    let seen: HashSet<&str> = results
        .first_clause
        .iter()
        .map(|c| c.text.as_str())
        .collect();
    results
        .first_clause
        .iter()
        .chain(results.main.iter().filter(|c| !seen.contains(c.text.as_str())))
        .cloned()
        .collect()
}

pub(super) fn cyclic_index(current: usize, delta: isize, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let n = count as isize;
    (current as isize + delta).rem_euclid(n) as usize
}

impl Session {
    /// The currently displayed candidate list.
    pub fn candidates(&self) -> Vec<Candidate> {
        self.raw_results
            .as_ref()
            .map(|r| derive_candidates(r, self.did_experience_segment_edition))
            .unwrap_or_default()
    }

    pub fn selection_index(&self) -> Option<usize> {
        let len = self.candidates().len();
        self.selection_index.filter(|&i| i < len)
    }

    pub fn selected_candidate(&self) -> Option<Candidate> {
        let index = self.selection_index?;
        self.candidates().into_iter().nth(index)
    }

    /// The candidate a submit commits: the selection, or the first candidate
    /// when nothing is selected. Matches what selecting-state marked text focuses.
    pub fn candidate_for_submit(&self) -> Option<Candidate> {
        let candidates = self.candidates();
        let index = self
            .selection_index
            .unwrap_or(0)
            .min(candidates.len().saturating_sub(1));
        candidates.into_iter().nth(index)
    }

    pub fn select_next_candidate(&mut self) {
        self.step_selection(1);
    }

    pub fn select_prev_candidate(&mut self) {
        self.step_selection(-1);
    }

    fn step_selection(&mut self, delta: isize) {
        let len = self.candidates().len();
        if len == 0 {
            self.selection_index = None;
            return;
        }
        self.selection_index = Some(match self.selection_index {
            Some(current) => cyclic_index(current.min(len - 1), delta, len),
            None if delta > 0 => 0,
            None => len - 1,
        });
    }

    /// Pick the `n`th (1-based) candidate on the current page. Out-of-range
    /// numbers select nothing.
    pub fn select_number_candidate(&mut self, n: u8) -> Option<Candidate> {
        let n = usize::from(n);
        if !(1..=PAGE_SIZE).contains(&n) {
            return None;
        }
        let candidates = self.candidates();
        let page_start = self.selection_index.unwrap_or(0) / PAGE_SIZE * PAGE_SIZE;
        let index = page_start + n - 1;
        let candidate = candidates.into_iter().nth(index)?;
        self.selection_index = Some(index);
        Some(candidate)
    }

    /// Selection change from the pointer, clamped into the list.
    pub fn set_selection_index(&mut self, index: usize) {
        let len = self.candidates().len();
        self.selection_index = if len == 0 {
            None
        } else {
            Some(index.min(len - 1))
        };
    }

    pub fn candidate_window(&self, state: CompositionState) -> CandidateWindow {
        let candidates = self.candidates();
        if candidates.is_empty() {
            return CandidateWindow::Hidden;
        }
        match state {
            CompositionState::Idle => CandidateWindow::Hidden,
            CompositionState::Composing if !self.should_show_candidate_window => {
                CandidateWindow::Hidden
            }
            CompositionState::Composing => {
                let selection = self.selection_index.filter(|&i| i < candidates.len());
                CandidateWindow::Composing {
                    candidates,
                    selection,
                }
            }
            CompositionState::Selecting => {
                let selection = Some(self.selection_index.unwrap_or(0).min(candidates.len() - 1));
                CandidateWindow::Selecting {
                    candidates,
                    selection,
                }
            }
        }
    }
}
