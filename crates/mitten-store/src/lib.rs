//! Attraction persistence.
//!
//! The store is a single pretty-printed JSON array on disk. Reads are
//! forgiving so a damaged file never blocks a harvest run; writes go
//! through [`AttractionStore::merge`], which deduplicates candidates
//! against what is already stored.

pub mod repository;

pub use repository::{AttractionStore, MergeReport};
