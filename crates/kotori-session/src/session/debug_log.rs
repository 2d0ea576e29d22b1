use std::collections::VecDeque;

use kotori_core::conversion::Candidate;

pub const DEBUG_LOG_CAPACITY: usize = 100;

/// Most recent diagnostic candidates, newest first. Purely observational.
#[derive(Debug, Clone, Default)]
pub struct DebugCandidateLog {
    entries: VecDeque<Candidate>,
}

impl DebugCandidateLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, candidate: Candidate) {
        self.entries.push_front(candidate);
        self.entries.truncate(DEBUG_LOG_CAPACITY);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_and_bounded() {
        let mut log = DebugCandidateLog::new();
        for i in 0..(DEBUG_LOG_CAPACITY + 5) {
            log.record(Candidate::new(i.to_string(), 1));
        }
        assert_eq!(log.len(), DEBUG_LOG_CAPACITY);
        let first = log.iter().next().map(|c| c.text.clone());
        assert_eq!(first.as_deref(), Some("104"));
        let last = log.iter().last().map(|c| c.text.clone());
        assert_eq!(last.as_deref(), Some("5"));
    }
}
