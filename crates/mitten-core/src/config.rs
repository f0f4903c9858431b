//! Tuning knobs and the external source registry.

use crate::category::Category;
use crate::error::AppError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public Overpass interpreter endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Retry schedule for the Overpass fetch loop.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Backoff after attempt `attempt` failed, doubling each time.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Settings for the Overpass client.
#[derive(Debug, Clone)]
pub struct OverpassConfig {
    pub endpoint: String,
    /// Server-side query budget, embedded in the query header.
    pub query_timeout_secs: u32,
    /// Client-side HTTP timeout.
    pub http_timeout: Duration,
    pub retry: RetryPolicy,
    /// Pause between partition fetches.
    pub chunk_pacing: Duration,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OVERPASS_URL.to_string(),
            query_timeout_secs: 30,
            http_timeout: Duration::from_secs(120),
            retry: RetryPolicy::default(),
            chunk_pacing: Duration::from_secs(1),
        }
    }
}

/// Settings for DNR CSV downloads.
#[derive(Debug, Clone)]
pub struct DnrConfig {
    pub http_timeout: Duration,
}

impl Default for DnrConfig {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(30),
        }
    }
}

/// One DNR CSV download target with its operator-assigned category.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DnrSource {
    /// Short key used in logs and error messages.
    pub key: String,
    pub url: String,
    /// Category stamped on every record from this source.
    pub category: Category,
}

#[derive(Debug, Deserialize)]
struct SourcesConfig {
    #[serde(default)]
    dnr: Vec<DnrSource>,
}

/// The DNR sources harvested when no sources file overrides them.
pub fn builtin_dnr_sources() -> Vec<DnrSource> {
    vec![
        DnrSource {
            key: "parks".to_string(),
            url: "https://gis-midnr.opendata.arcgis.com/datasets/midnr::michigan-state-park-boundaries-1.csv".to_string(),
            category: Category::ParksNature,
        },
        DnrSource {
            key: "campgrounds".to_string(),
            url: "https://gis-midnr.opendata.arcgis.com/datasets/michigan-state-park-campgrounds-1.csv".to_string(),
            category: Category::FamilyFun,
        },
        DnrSource {
            key: "trails".to_string(),
            url: "https://gis-midnr.opendata.arcgis.com/datasets/dnr-trails.csv".to_string(),
            category: Category::HikingBikingTrails,
        },
    ]
}

/// Default location of the sources file: `<config dir>/mitten/sources.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mitten").join("sources.toml"))
}

/// Loads the DNR source registry.
///
/// Without an explicit path, a missing file at the default location means
/// the builtin registry applies. An explicit path must exist and parse. A
/// present file replaces the builtins entirely, so an empty `dnr` table
/// disables DNR harvesting.
pub fn load_sources_config(path: Option<&Path>) -> Result<Vec<DnrSource>, AppError> {
    let resolved = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok(builtin_dnr_sources()),
        },
    };
    if path.is_none() && !resolved.exists() {
        return Ok(builtin_dnr_sources());
    }
    let raw = std::fs::read_to_string(&resolved)
        .map_err(|e| AppError::ConfigError(format!("Cannot read {}: {}", resolved.display(), e)))?;
    let parsed: SourcesConfig = toml::from_str(&raw).map_err(|e| {
        AppError::ConfigError(format!("Invalid sources file {}: {}", resolved.display(), e))
    })?;
    Ok(parsed.dnr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_retry_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    }

    #[test]
    fn test_overpass_defaults() {
        let config = OverpassConfig::default();
        assert_eq!(config.endpoint, DEFAULT_OVERPASS_URL);
        assert_eq!(config.query_timeout_secs, 30);
        assert_eq!(config.http_timeout, Duration::from_secs(120));
        assert_eq!(config.chunk_pacing, Duration::from_secs(1));
    }

    #[test]
    fn test_builtin_sources() {
        let sources = builtin_dnr_sources();
        assert_eq!(sources.len(), 3);
        assert_eq!(sources[0].key, "parks");
        assert_eq!(sources[0].category, Category::ParksNature);
        assert_eq!(sources[1].category, Category::FamilyFun);
        assert_eq!(sources[2].category, Category::HikingBikingTrails);
        assert!(sources[2].url.ends_with("dnr-trails.csv"));
    }

    #[test]
    fn test_load_sources_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.toml");
        fs::write(
            &path,
            r#"
[[dnr]]
key = "parks"
url = "https://example.com/parks.csv"
category = "Parks & Nature"

[[dnr]]
key = "boat-launches"
url = "https://example.com/launches.csv"
category = "Family Fun"
"#,
        )
        .unwrap();

        let sources = load_sources_config(Some(&path)).unwrap();
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].url, "https://example.com/parks.csv");
        assert_eq!(sources[1].key, "boat-launches");
        assert_eq!(sources[1].category, Category::FamilyFun);
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(
            load_sources_config(Some(&path)),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn test_malformed_sources_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.toml");
        fs::write(&path, "dnr = 3").unwrap();
        assert!(matches!(
            load_sources_config(Some(&path)),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn test_unknown_category_label_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.toml");
        fs::write(
            &path,
            r#"
[[dnr]]
key = "parks"
url = "https://example.com/parks.csv"
category = "Space Elevators"
"#,
        )
        .unwrap();
        assert!(matches!(
            load_sources_config(Some(&path)),
            Err(AppError::ConfigError(_))
        ));
    }
}
