//! Record types shared across the harvester.

use crate::category::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tag map carried on every record.
///
/// Ordered so that serialized records are byte-stable across runs.
pub type TagMap = BTreeMap<String, String>;

/// Where a record was harvested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "OpenStreetMap")]
    OpenStreetMap,
    #[serde(rename = "Michigan DNR")]
    MichiganDnr,
}

impl Source {
    pub fn label(&self) -> &'static str {
        match self {
            Source::OpenStreetMap => "OpenStreetMap",
            Source::MichiganDnr => "Michigan DNR",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A parsed candidate that has not been assigned an identity yet.
#[derive(Debug, Clone)]
pub struct NewAttraction {
    pub name: String,
    pub category: Category,
    pub source: Source,
    pub tags: TagMap,
    pub latitude: f64,
    pub longitude: f64,
}

/// A stored attraction record.
///
/// `category` serializes as `type` to match the store file layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attraction {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub source: Source,
    #[serde(default)]
    pub tags: TagMap,
    pub latitude: f64,
    pub longitude: f64,
}
