use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use tracing::debug;

use super::{
    Candidate, CandidateSegment, ConversionEngine, ConversionError, ConversionResults,
    ConvertOptions, ReadingTable,
};
use crate::settings::LearningPolicy;
use crate::unicode::hiragana_to_katakana;

/// Deterministic dictionary-table engine.
///
/// Main results convert the whole target (greedy longest match, exact
/// readings, hiragana, katakana). First-clause results cover the longest
/// dictionary prefix. Learned surfaces are promoted per reading.
pub struct TableEngine {
    table: ReadingTable,
    learned: RwLock<HashMap<String, Vec<String>>>,
    policy: Mutex<LearningPolicy>,
    cache: Mutex<Option<CachedRequest>>,
}

struct CachedRequest {
    target: String,
    options: ConvertOptions,
    results: ConversionResults,
}

impl TableEngine {
    pub fn new(table: ReadingTable) -> Self {
        Self {
            table,
            learned: RwLock::new(HashMap::new()),
            policy: Mutex::new(LearningPolicy::InputAndOutput),
            cache: Mutex::new(None),
        }
    }

    /// Surfaces for a reading, learned ones first (most recent first).
    fn surfaces_for(&self, reading: &str, policy: LearningPolicy) -> Vec<String> {
        let mut surfaces: Vec<String> = Vec::new();
        if policy != LearningPolicy::Nothing {
            if let Some(learned) = self.learned.read().ok().and_then(|l| l.get(reading).cloned()) {
                surfaces.extend(learned);
            }
        }
        for s in self.table.lookup(reading).unwrap_or_default() {
            if !surfaces.contains(s) {
                surfaces.push(s.clone());
            }
        }
        surfaces
    }

    /// Greedy longest-match conversion of the whole target.
    fn best_path(&self, chars: &[char], policy: LearningPolicy) -> Vec<CandidateSegment> {
        let mut segments = Vec::new();
        let mut pos = 0;
        while pos < chars.len() {
            let rest = &chars[pos..];
            let (len, surface) = match self.table.prefixes(rest).first() {
                Some(&(len, _)) => {
                    let reading: String = rest[..len].iter().collect();
                    let surface = self
                        .surfaces_for(&reading, policy)
                        .into_iter()
                        .next()
                        .unwrap_or(reading);
                    (len, surface)
                }
                None => (1, rest[0].to_string()),
            };
            segments.push(CandidateSegment {
                reading: rest[..len].iter().collect(),
                surface,
            });
            pos += len;
        }
        segments
    }

    fn convert(&self, target: &str, options: &ConvertOptions) -> ConversionResults {
        let chars: Vec<char> = target.chars().collect();
        let count = chars.len();
        let policy = options.learning;

        let mut main = RankedList::new(options.max_results);
        let path = self.best_path(&chars, policy);
        let best: String = path.iter().map(|s| s.surface.as_str()).collect();
        main.push(Candidate::new(best, count).with_segments(path));
        for surface in self.surfaces_for(target, policy) {
            main.push(Candidate::new(surface.clone(), count).with_segments(vec![
                CandidateSegment {
                    reading: target.to_string(),
                    surface,
                },
            ]));
        }
        main.push(Candidate::new(target, count));
        main.push(Candidate::new(hiragana_to_katakana(target), count));
        if options.english_prediction && target.is_ascii() {
            main.push(Candidate::new(target.to_ascii_lowercase(), count));
        }

        let mut first_clause = RankedList::new(options.max_results);
        let prefixes = self.table.prefixes(&chars);
        let take = if options.rich_candidates { prefixes.len() } else { 1 };
        for &(len, _) in prefixes.iter().take(take) {
            let reading: String = chars[..len].iter().collect();
            for surface in self.surfaces_for(&reading, policy) {
                first_clause.push(Candidate::new(surface.clone(), len).with_segments(vec![
                    CandidateSegment {
                        reading: reading.clone(),
                        surface,
                    },
                ]));
            }
            first_clause.push(Candidate::new(reading, len));
        }

        ConversionResults {
            first_clause: first_clause.finish(),
            main: main.finish(),
        }
    }
}

impl ConversionEngine for TableEngine {
    fn request_candidates(
        &self,
        target: &str,
        options: &ConvertOptions,
    ) -> Result<ConversionResults, ConversionError> {
        if target.is_empty() {
            return Ok(ConversionResults::default());
        }
        if let Ok(mut policy) = self.policy.lock() {
            *policy = options.learning;
        }
        if let Ok(cache) = self.cache.lock() {
            if let Some(hit) = cache
                .as_ref()
                .filter(|c| c.target == target && c.options == *options)
            {
                return Ok(hit.results.clone());
            }
        }

        let results = self.convert(target, options);
        debug!(
            target,
            first_clause = results.first_clause.len(),
            main = results.main.len(),
            "table conversion"
        );
        if let Ok(mut cache) = self.cache.lock() {
            *cache = Some(CachedRequest {
                target: target.to_string(),
                options: options.clone(),
                results: results.clone(),
            });
        }
        Ok(results)
    }

    fn complete_candidate(&self, candidate: &Candidate) {
        let policy = self
            .policy
            .lock()
            .map(|p| *p)
            .unwrap_or(LearningPolicy::Nothing);
        if policy != LearningPolicy::InputAndOutput || candidate.associated_data.is_empty() {
            return;
        }
        if let Ok(mut learned) = self.learned.write() {
            for seg in &candidate.associated_data {
                let surfaces = learned.entry(seg.reading.clone()).or_default();
                surfaces.retain(|s| s != &seg.surface);
                surfaces.insert(0, seg.surface.clone());
            }
        }
        self.reset_session();
    }

    fn reset_session(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            *cache = None;
        }
    }
}

/// Deduplicating, size-capped candidate list that assigns descending scores.
struct RankedList {
    items: Vec<Candidate>,
    cap: usize,
}

impl RankedList {
    fn new(cap: usize) -> Self {
        Self {
            items: Vec::new(),
            cap,
        }
    }

    fn push(&mut self, candidate: Candidate) {
        if candidate.text.is_empty()
            || self.items.len() >= self.cap
            || self.items.iter().any(|c| c.text == candidate.text)
        {
            return;
        }
        let score = -(self.items.len() as f32);
        self.items.push(candidate.with_score(score));
    }

    fn finish(self) -> Vec<Candidate> {
        self.items
    }
}
