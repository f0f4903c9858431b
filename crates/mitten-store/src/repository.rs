//! File-backed attraction store with merge-time deduplication.

use mitten_core::{dedup_candidates, AppError, Attraction, NewAttraction};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of one merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    /// Records newly written by this merge.
    pub added: usize,
    /// Candidates dropped as duplicates.
    pub duplicates: usize,
    /// Records in the store after the merge.
    pub total: usize,
}

/// JSON-file store holding every harvested attraction.
pub struct AttractionStore {
    path: PathBuf,
}

impl AttractionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every stored record.
    ///
    /// A missing file is a normal first run and logs as such. An
    /// unreadable or corrupt file degrades to an empty store with a
    /// louder warning, since a merge that cannot see prior records will
    /// re-add them.
    pub async fn load(&self) -> Vec<Attraction> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No store at {} yet, starting fresh", self.path.display());
                return Vec::new();
            }
            Err(e) => {
                warn!(
                    "Store {} exists but cannot be read ({}), treating it as empty; existing records will not deduplicate this run",
                    self.path.display(),
                    e
                );
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    "Store {} is not valid JSON ({}), treating it as empty; existing records will not deduplicate this run",
                    self.path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Merges candidates into the store and persists the result.
    ///
    /// Loads the file once, deduplicates against stored identities and
    /// within the batch, appends the survivors, and rewrites the file.
    pub async fn merge(&self, candidates: Vec<NewAttraction>) -> Result<MergeReport, AppError> {
        let mut records = self.load().await;
        let existing: HashSet<String> = records.iter().map(|a| a.id.clone()).collect();
        let outcome = dedup_candidates(&existing, candidates);
        let added = outcome.added.len();
        records.extend(outcome.added);
        self.save(&records).await?;
        Ok(MergeReport {
            added,
            duplicates: outcome.duplicates,
            total: records.len(),
        })
    }

    async fn save(&self, records: &[Attraction]) -> Result<(), AppError> {
        let serialized = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, serialized).await?;
        Ok(())
    }
}
