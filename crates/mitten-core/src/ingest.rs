//! Run bookkeeping and candidate deduplication.

use crate::identity::attraction_id;
use crate::models::{Attraction, NewAttraction};
use std::collections::HashSet;

/// What happened to one unit of work during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Fetched and parsed, yielding this many candidates.
    Fetched(usize),
    /// Failed after exhausting its error handling; the run went on.
    Skipped,
}

/// Counters accumulated over one harvest run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub windows_fetched: usize,
    pub windows_skipped: usize,
    pub sources_loaded: usize,
    pub sources_skipped: usize,
    pub candidates: usize,
}

impl IngestStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_window(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Fetched(count) => {
                self.windows_fetched += 1;
                self.candidates += count;
            }
            FetchOutcome::Skipped => self.windows_skipped += 1,
        }
    }

    pub fn record_source(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Fetched(count) => {
                self.sources_loaded += 1;
                self.candidates += count;
            }
            FetchOutcome::Skipped => self.sources_skipped += 1,
        }
    }
}

/// Result of deduplicating one batch of candidates.
#[derive(Debug, Clone)]
pub struct DedupOutcome {
    pub added: Vec<Attraction>,
    pub duplicates: usize,
}

/// Assigns identities and drops candidates already present.
///
/// Duplicates against `existing` and within the batch itself both count.
/// The first occurrence of an in-batch duplicate wins, and input order is
/// preserved in `added`.
pub fn dedup_candidates(
    existing: &HashSet<String>,
    candidates: Vec<NewAttraction>,
) -> DedupOutcome {
    let mut seen: HashSet<String> = HashSet::new();
    let mut added = Vec::new();
    let mut duplicates = 0;
    for candidate in candidates {
        let id = attraction_id(
            &candidate.name,
            candidate.category,
            candidate.source,
            candidate.latitude,
            candidate.longitude,
        );
        if existing.contains(&id) || seen.contains(&id) {
            duplicates += 1;
            continue;
        }
        seen.insert(id.clone());
        added.push(Attraction {
            id,
            name: candidate.name,
            category: candidate.category,
            source: candidate.source,
            tags: candidate.tags,
            latitude: candidate.latitude,
            longitude: candidate.longitude,
        });
    }
    DedupOutcome { added, duplicates }
}
