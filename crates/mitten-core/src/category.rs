//! Attraction categories and tag-based classification.

use crate::error::AppError;
use crate::models::TagMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// An OSM-style `(key, value)` tag pair.
pub type TagPair = (&'static str, &'static str);

/// The closed set of attraction categories.
///
/// Serialized form is the human-readable label, which is also what the
/// store file and the DNR source registry carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Lighthouses")]
    Lighthouses,
    #[serde(rename = "Parks & Nature")]
    ParksNature,
    #[serde(rename = "Beaches & Lakeshores")]
    BeachesLakeshores,
    #[serde(rename = "Waterfalls")]
    Waterfalls,
    #[serde(rename = "Museums & Historic Sites")]
    MuseumsHistoricSites,
    #[serde(rename = "Public Art & Sculptures")]
    PublicArtSculptures,
    #[serde(rename = "Breweries & Wineries")]
    BreweriesWineries,
    #[serde(rename = "Hiking & Biking Trails")]
    HikingBikingTrails,
    #[serde(rename = "Family Fun")]
    FamilyFun,
}

impl Category {
    /// Every category, in registry order.
    pub const ALL: [Category; 9] = [
        Category::Lighthouses,
        Category::ParksNature,
        Category::BeachesLakeshores,
        Category::Waterfalls,
        Category::MuseumsHistoricSites,
        Category::PublicArtSculptures,
        Category::BreweriesWineries,
        Category::HikingBikingTrails,
        Category::FamilyFun,
    ];

    /// The human-readable label used in the store and in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Lighthouses => "Lighthouses",
            Category::ParksNature => "Parks & Nature",
            Category::BeachesLakeshores => "Beaches & Lakeshores",
            Category::Waterfalls => "Waterfalls",
            Category::MuseumsHistoricSites => "Museums & Historic Sites",
            Category::PublicArtSculptures => "Public Art & Sculptures",
            Category::BreweriesWineries => "Breweries & Wineries",
            Category::HikingBikingTrails => "Hiking & Biking Trails",
            Category::FamilyFun => "Family Fun",
        }
    }

    /// A shell-friendly form of the label for CLI flags.
    pub fn slug(&self) -> &'static str {
        match self {
            Category::Lighthouses => "lighthouses",
            Category::ParksNature => "parks-nature",
            Category::BeachesLakeshores => "beaches-lakeshores",
            Category::Waterfalls => "waterfalls",
            Category::MuseumsHistoricSites => "museums-historic-sites",
            Category::PublicArtSculptures => "public-art-sculptures",
            Category::BreweriesWineries => "breweries-wineries",
            Category::HikingBikingTrails => "hiking-biking-trails",
            Category::FamilyFun => "family-fun",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let slugged = trimmed.to_ascii_lowercase().replace([' ', '_'], "-");
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(trimmed) || c.slug() == slugged)
            .ok_or_else(|| AppError::UnknownCategory(s.to_string()))
    }
}

/// The ordered registry of tag pairs each category claims.
///
/// Order matters twice: classification scans the flattened registry top to
/// bottom, and query construction emits a category's pairs in this order.
pub const CATEGORY_REGISTRY: &[(Category, &[TagPair])] = &[
    (
        Category::Lighthouses,
        &[
            ("man_made", "lighthouse"),
            ("tourism", "lighthouse"),
            ("seamark:type", "lighthouse"),
        ],
    ),
    (
        Category::ParksNature,
        &[
            ("leisure", "park"),
            ("natural", "wood"),
            ("landuse", "recreation_ground"),
            ("boundary", "protected_area"),
        ],
    ),
    (
        Category::BeachesLakeshores,
        &[
            ("natural", "beach"),
            ("leisure", "beach_resort"),
            ("tourism", "beach"),
        ],
    ),
    (
        Category::Waterfalls,
        &[("natural", "waterfall"), ("waterway", "waterfall")],
    ),
    (
        Category::MuseumsHistoricSites,
        &[("tourism", "museum"), ("historic", "monument")],
    ),
    (Category::PublicArtSculptures, &[("tourism", "artwork")]),
    (
        Category::BreweriesWineries,
        &[
            ("craft", "brewery"),
            ("industrial", "brewery"),
            ("amenity", "brewery"),
        ],
    ),
    (
        Category::HikingBikingTrails,
        &[
            ("highway", "path"),
            ("route", "hiking"),
            ("route", "bicycle"),
            ("leisure", "track"),
        ],
    ),
    (
        Category::FamilyFun,
        &[
            ("tourism", "theme_park"),
            ("tourism", "zoo"),
            ("leisure", "water_park"),
        ],
    ),
];

/// Keys that keep an element classifiable even without an explicit pair.
const INTERESTING_KEYS: &[&str] = &[
    "tourism", "leisure", "natural", "historic", "man_made", "highway", "route", "waterway",
];

/// Flattened pair lookup derived from an ordered registry.
///
/// Duplicate registrations resolve explicitly: the pair keeps the position
/// of its first registration and takes the category of its last one, so a
/// late re-registration changes what a pair means but not when it is
/// checked.
pub struct CategoryLookup {
    entries: Vec<(TagPair, Category)>,
}

impl CategoryLookup {
    /// Builds the lookup from an ordered registry slice.
    pub fn from_registry(registry: &[(Category, &[TagPair])]) -> Self {
        let mut entries: Vec<(TagPair, Category)> = Vec::new();
        for (category, pairs) in registry {
            for pair in *pairs {
                match entries.iter_mut().find(|(existing, _)| existing == pair) {
                    Some((_, slot)) => *slot = *category,
                    None => entries.push((*pair, *category)),
                }
            }
        }
        Self { entries }
    }

    /// Returns the category of the first entry whose pair appears in `tags`.
    pub fn match_tags(&self, tags: &TagMap) -> Option<Category> {
        self.entries
            .iter()
            .find(|((key, value), _)| tags.get(*key).map(String::as_str) == Some(*value))
            .map(|(_, category)| *category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn lookup() -> &'static CategoryLookup {
    static LOOKUP: OnceLock<CategoryLookup> = OnceLock::new();
    LOOKUP.get_or_init(|| CategoryLookup::from_registry(CATEGORY_REGISTRY))
}

/// Maps a tag set to exactly one category, or `None` for unclassifiable
/// elements, which callers must drop.
///
/// Priority order is a contract: explicit registry pairs first, then the
/// fixed heuristics, then the broad fallback over [`INTERESTING_KEYS`]
/// members. A tag set matching both an explicit pair and a heuristic
/// always resolves via the pair.
pub fn classify(tags: &TagMap) -> Option<Category> {
    if tags.is_empty() {
        return None;
    }

    // explicit pair check
    if let Some(category) = lookup().match_tags(tags) {
        return Some(category);
    }

    // heuristics & special cases
    let tourism = tags.get("tourism").map(String::as_str);
    if matches!(tourism, Some("museum" | "gallery" | "attraction")) {
        return Some(Category::MuseumsHistoricSites);
    }
    let natural = tags.get("natural").map(String::as_str);
    if natural == Some("beach") {
        return Some(Category::BeachesLakeshores);
    }
    if natural == Some("waterfall") || tags.get("waterway").map(String::as_str) == Some("waterfall")
    {
        return Some(Category::Waterfalls);
    }
    let name = tags.get("name").map(|n| n.to_lowercase()).unwrap_or_default();
    if name.contains("zoo") || tourism == Some("zoo") {
        return Some(Category::FamilyFun);
    }

    // default fallbacks
    if INTERESTING_KEYS.iter().any(|key| tags.contains_key(*key)) {
        if matches!(tourism, Some("theme_park" | "attraction")) {
            return Some(Category::FamilyFun);
        }
        return Some(Category::ParksNature);
    }

    None
}

/// The tag pairs registered for one category, in registry order.
pub fn registered_pairs(category: Category) -> &'static [TagPair] {
    CATEGORY_REGISTRY
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, pairs)| *pairs)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(pairs: &[(&str, &str)]) -> TagMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_label_and_slug_parse_back() {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>().unwrap(), category);
            assert_eq!(category.slug().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_serializes_to_label() {
        let json = serde_json::to_string(&Category::BeachesLakeshores).unwrap();
        assert_eq!(json, "\"Beaches & Lakeshores\"");
    }

    #[test]
    fn test_category_deserializes_from_label() {
        let category: Category = serde_json::from_str("\"Hiking & Biking Trails\"").unwrap();
        assert_eq!(category, Category::HikingBikingTrails);
    }

    #[test]
    fn test_unknown_category_rejected() {
        assert!(matches!(
            "Space Elevators".parse::<Category>(),
            Err(AppError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_explicit_pair_beats_heuristic() {
        // craft=brewery is a registry pair; tourism=gallery only matches a
        // heuristic, so the pair must win.
        let result = classify(&tags(&[("craft", "brewery"), ("tourism", "gallery")]));
        assert_eq!(result, Some(Category::BreweriesWineries));
    }

    #[test]
    fn test_registry_order_resolves_multi_pair_tags() {
        // Both pairs are registered; leisure=park comes first in the registry.
        let result = classify(&tags(&[("leisure", "park"), ("tourism", "zoo")]));
        assert_eq!(result, Some(Category::ParksNature));
    }

    #[test]
    fn test_museum_heuristic() {
        assert_eq!(
            classify(&tags(&[("tourism", "gallery")])),
            Some(Category::MuseumsHistoricSites)
        );
        assert_eq!(
            classify(&tags(&[("tourism", "attraction")])),
            Some(Category::MuseumsHistoricSites)
        );
    }

    #[test]
    fn test_museum_scenario() {
        assert_eq!(
            classify(&tags(&[("tourism", "museum")])),
            Some(Category::MuseumsHistoricSites)
        );
    }

    #[test]
    fn test_beach_scenario() {
        assert_eq!(
            classify(&tags(&[("natural", "beach")])),
            Some(Category::BeachesLakeshores)
        );
    }

    #[test]
    fn test_waterfall_via_waterway() {
        assert_eq!(
            classify(&tags(&[("waterway", "waterfall")])),
            Some(Category::Waterfalls)
        );
    }

    #[test]
    fn test_zoo_in_name() {
        let result = classify(&tags(&[("name", "Detroit Zoo"), ("building", "yes")]));
        assert_eq!(result, Some(Category::FamilyFun));
    }

    #[test]
    fn test_broad_fallback_is_parks() {
        assert_eq!(
            classify(&tags(&[("historic", "yes")])),
            Some(Category::ParksNature)
        );
    }

    #[test]
    fn test_unrecognized_tags_unclassified() {
        assert_eq!(classify(&tags(&[("random_key", "x")])), None);
    }

    #[test]
    fn test_empty_tags_unclassified() {
        assert_eq!(classify(&TagMap::new()), None);
    }

    #[test]
    fn test_duplicate_pair_keeps_position_takes_last_category() {
        let registry: &[(Category, &[TagPair])] = &[
            (Category::ParksNature, &[("a", "1")]),
            (Category::BreweriesWineries, &[("b", "2")]),
            (Category::FamilyFun, &[("a", "1")]),
        ];
        let lookup = CategoryLookup::from_registry(registry);

        // no duplicate entry is stored
        assert_eq!(lookup.len(), 2);
        // the re-registered pair reports the last category
        assert_eq!(
            lookup.match_tags(&tags(&[("a", "1")])),
            Some(Category::FamilyFun)
        );
        // and is still checked before later entries
        assert_eq!(
            lookup.match_tags(&tags(&[("a", "1"), ("b", "2")])),
            Some(Category::FamilyFun)
        );
    }

    #[test]
    fn test_registered_pairs() {
        let pairs = registered_pairs(Category::Lighthouses);
        assert_eq!(pairs.len(), 3);
        assert!(pairs.contains(&("seamark:type", "lighthouse")));
    }
}
