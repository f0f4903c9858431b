//! Deterministic record identities for cross-run deduplication.

use crate::category::Category;
use crate::models::Source;
use sha2::{Digest, Sha256};

/// Computes the stable identity for an attraction.
///
/// The identity hashes name, category label, and source label. Coordinates
/// are mixed in for every category except trails: trail geometry yields one
/// OSM element per segment, and hashing coordinates would store the same
/// named trail once per segment instead of once.
///
/// ```
/// use mitten_core::{attraction_id, Category, Source};
///
/// let id = attraction_id(
///     "Big Sable Point Light",
///     Category::Lighthouses,
///     Source::OpenStreetMap,
///     44.0573,
///     -86.5135,
/// );
/// assert_eq!(id.len(), 64);
/// ```
pub fn attraction_id(
    name: &str,
    category: Category,
    source: Source,
    latitude: f64,
    longitude: f64,
) -> String {
    let mut base = format!("{}_{}_{}", name, category.label(), source.label());
    if category != Category::HikingBikingTrails {
        base.push_str(&format!("_{}_{}", latitude, longitude));
    }
    let mut hasher = Sha256::new();
    hasher.update(base.as_bytes());
    format!("{:x}", hasher.finalize())
}
