//! Michigan regions, the built-in city table, and run selection.

use crate::error::AppError;
use crate::geo::BoundingBox;
use std::fmt;
use std::str::FromStr;

/// Half-width in degrees of the query window centered on a city.
const CITY_RADIUS_DEG: f64 = 0.2;

/// The fixed fetch regions, each with a hand-tuned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    UpperPeninsula,
    LowerPeninsula,
    EntireState,
}

impl Region {
    /// The bounding box covering this region.
    pub fn bounds(&self) -> BoundingBox {
        match self {
            Region::UpperPeninsula => BoundingBox::new(45.0, -90.5, 47.5, -83.5),
            Region::LowerPeninsula => BoundingBox::new(41.7, -87.0, 45.9, -82.4),
            Region::EntireState => BoundingBox::new(41.7, -90.5, 47.5, -82.4),
        }
    }

    fn slug(&self) -> &'static str {
        match self {
            Region::UpperPeninsula => "upper-peninsula",
            Region::LowerPeninsula => "lower-peninsula",
            Region::EntireState => "entire-state",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Region {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "upper-peninsula" | "up" => Ok(Region::UpperPeninsula),
            "lower-peninsula" | "lp" => Ok(Region::LowerPeninsula),
            "entire-state" | "state" => Ok(Region::EntireState),
            _ => Err(AppError::UnknownRegion(s.to_string())),
        }
    }
}

/// A named locality with a fixed coordinate, fetched as a small window.
#[derive(Debug, Clone, Copy)]
pub struct City {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

impl City {
    /// Looks a city up by name, tolerating spaces, underscores, and case.
    pub fn find(name: &str) -> Option<&'static City> {
        let normalized = name.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        CITIES.iter().find(|city| city.name == normalized)
    }

    /// The query window centered on this city.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(
            self.latitude - CITY_RADIUS_DEG,
            self.longitude - CITY_RADIUS_DEG,
            self.latitude + CITY_RADIUS_DEG,
            self.longitude + CITY_RADIUS_DEG,
        )
    }
}

/// Built-in city table, alphabetical by name.
pub static CITIES: &[City] = &[
    City { name: "alpena", latitude: 45.0617, longitude: -83.4327 },
    City { name: "ann-arbor", latitude: 42.2808, longitude: -83.7430 },
    City { name: "detroit", latitude: 42.3314, longitude: -83.0458 },
    City { name: "escanaba", latitude: 45.7458, longitude: -87.0646 },
    City { name: "flint", latitude: 43.0125, longitude: -83.6875 },
    City { name: "grand-rapids", latitude: 42.9634, longitude: -85.6681 },
    City { name: "holland", latitude: 42.7875, longitude: -86.1089 },
    City { name: "houghton", latitude: 47.1211, longitude: -88.5694 },
    City { name: "kalamazoo", latitude: 42.2917, longitude: -85.5872 },
    City { name: "lansing", latitude: 42.7325, longitude: -84.5555 },
    City { name: "mackinaw-city", latitude: 45.7775, longitude: -84.7271 },
    City { name: "marquette", latitude: 46.5436, longitude: -87.3954 },
    City { name: "munising", latitude: 46.4111, longitude: -86.6481 },
    City { name: "muskegon", latitude: 43.2342, longitude: -86.2484 },
    City { name: "petoskey", latitude: 45.3733, longitude: -84.9553 },
    City { name: "port-huron", latitude: 42.9709, longitude: -82.4249 },
    City { name: "sault-ste-marie", latitude: 46.4953, longitude: -84.3453 },
    City { name: "traverse-city", latitude: 44.7631, longitude: -85.6206 },
];

/// What a single run should cover.
#[derive(Debug, Clone, Copy)]
pub enum RegionSelection {
    /// One fixed region, fetched as a single window.
    Region(Region),
    /// The entire state, split into the fetch grid.
    FullGrid,
    /// A small window around one named city.
    Locality(&'static City),
}

impl RegionSelection {
    /// The bounding boxes to fetch, in fetch order.
    pub fn windows(&self) -> Vec<BoundingBox> {
        match self {
            RegionSelection::Region(region) => vec![region.bounds()],
            RegionSelection::FullGrid => Region::EntireState.bounds().split_grid(),
            RegionSelection::Locality(city) => vec![city.bounds()],
        }
    }
}
