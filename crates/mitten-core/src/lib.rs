//! Mitten Core - Domain types, classification, and configuration.

pub mod category;
pub mod config;
pub mod error;
pub mod geo;
pub mod identity;
pub mod ingest;
pub mod models;
pub mod region;

pub use category::{classify, Category};
pub use config::{
    default_config_path, load_sources_config, DnrConfig, DnrSource, OverpassConfig, RetryPolicy,
};
pub use error::AppError;
pub use geo::BoundingBox;
pub use identity::attraction_id;
pub use ingest::{dedup_candidates, DedupOutcome, FetchOutcome, IngestStats};
pub use models::{Attraction, NewAttraction, Source, TagMap};
pub use region::{City, Region, RegionSelection};
