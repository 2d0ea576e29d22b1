use kotori_core::conversion::Candidate;

use super::{LastOperation, Session};

impl Session {
    pub fn insert_at_cursor_position(&mut self, text: &str) {
        self.buffer.insert_at_cursor(text);
        self.last_operation = LastOperation::Insert;
        self.should_show_candidate_window = !self.config.live_conversion;
        self.request_candidates(false);
    }

    /// Delete `count` units before the end of the buffer. A cursor left
    /// inside the buffer by segment editing is moved back to the end first.
    pub fn delete_backward(&mut self, count: usize) {
        if !self.buffer.is_at_end() {
            self.buffer.move_cursor_to_end();
            self.did_experience_segment_edition = false;
        }
        self.buffer.delete_backward(count);
        self.last_operation = LastOperation::Delete;
        self.should_show_candidate_window = !self.config.live_conversion;
        self.request_candidates(false);
    }

    /// Move the first-segment boundary by `delta` units.
    pub fn edit_segment(&mut self, delta: isize) {
        self.flush_pending_romaji();
        if let Some(count) = self.selected_candidate().map(|c| c.corresponding_count) {
            self.buffer.set_cursor(count);
        }
        if delta > 0 && self.buffer.is_at_end() && !self.did_experience_segment_edition {
            self.buffer.set_cursor(delta.unsigned_abs());
        } else {
            self.buffer.move_cursor(delta);
        }
        if self.buffer.cursor() == 0 {
            self.buffer.set_cursor(1);
        }
        self.did_experience_segment_edition = true;
        self.last_operation = LastOperation::EditSegment;
        self.should_show_candidate_window = true;
        self.request_candidates(true);
    }

    /// The leading segment was committed as `candidate`; keep the remainder
    /// composing and convert it.
    pub fn prefix_candidate_committed(&mut self, candidate: &Candidate) {
        self.learn(candidate);
        self.buffer.prefix_complete(candidate.corresponding_count);
        self.buffer.move_cursor_to_end();
        self.did_experience_segment_edition = false;
        self.last_operation = LastOperation::Other;
        self.should_show_candidate_window = true;
        self.request_candidates(true);
    }

    /// Flush romaji, request rich candidates and select the first one.
    pub fn enter_candidate_selection_mode(&mut self) {
        self.buffer.flush_romaji();
        self.should_show_candidate_window = true;
        self.select_first_on_results = true;
        self.request_candidates(true);
    }

    /// Resolve pending romaji (e.g. a trailing "n") and re-request if it changed the buffer.
    pub fn flush_pending_romaji(&mut self) {
        if self.buffer.pending_romaji_len() == 0 {
            return;
        }
        self.buffer.flush_romaji();
        self.request_candidates(false);
    }

    pub fn show_candidate_window(&mut self) {
        self.should_show_candidate_window = true;
    }

    pub fn hide_candidate_window(&mut self) {
        self.should_show_candidate_window = false;
        self.selection_index = None;
    }
}
