//! Michigan DNR CSV downloads and schema-resolved parsing.
//!
//! DNR open-data exports disagree on column naming, so each role (name,
//! latitude, longitude) carries an ordered alias list. Resolution picks
//! one column per role up front and the whole file is read against that
//! fixed schema.

use mitten_core::{AppError, DnrConfig, DnrSource, NewAttraction, Source, TagMap};
use std::time::Duration;
use tracing::debug;

/// Known column names per role, in priority order.
const NAME_ALIASES: &[&str] = &["FACILITY", "Name", "Trail_Name", "NAME", "name"];
const LAT_ALIASES: &[&str] = &["LATITUDE", "Latitude", "lat", "Y"];
const LON_ALIASES: &[&str] = &["LONGITUDE", "Longitude", "lon", "X"];

/// Extra columns copied into tags when present, with their tag keys.
const TAG_COLUMNS: &[(&str, &str)] = &[
    ("ACRES", "acres"),
    ("Type", "type"),
    ("Length_Miles", "length_miles"),
    ("Difficulty", "difficulty"),
    ("Surface_Type", "surface_type"),
];

/// Column indices resolved for one CSV export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DnrSchema {
    pub name: usize,
    pub latitude: usize,
    pub longitude: usize,
}

fn position(headers: &csv::StringRecord, aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == *alias))
}

impl DnrSchema {
    /// Resolves each role to the first alias present in the header.
    ///
    /// Alias matching is exact-case. A role with no recognizable column
    /// fails the whole source rather than guessing.
    pub fn resolve(source_key: &str, headers: &csv::StringRecord) -> Result<Self, AppError> {
        let name = position(headers, NAME_ALIASES).ok_or_else(|| AppError::SchemaResolution {
            source_key: source_key.to_string(),
            role: "name",
        })?;
        let latitude = position(headers, LAT_ALIASES).ok_or_else(|| AppError::SchemaResolution {
            source_key: source_key.to_string(),
            role: "latitude",
        })?;
        let longitude = position(headers, LON_ALIASES).ok_or_else(|| AppError::SchemaResolution {
            source_key: source_key.to_string(),
            role: "longitude",
        })?;
        Ok(Self {
            name,
            latitude,
            longitude,
        })
    }
}

fn parse_coord(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    value.is_finite().then_some(value)
}

fn parse_row(
    source: &DnrSource,
    schema: &DnrSchema,
    tag_columns: &[(usize, &str)],
    record: &csv::StringRecord,
) -> Option<NewAttraction> {
    let name = record.get(schema.name)?.trim();
    if name.is_empty() {
        return None;
    }
    let latitude = parse_coord(record.get(schema.latitude)?)?;
    let longitude = parse_coord(record.get(schema.longitude)?)?;

    let mut tags = TagMap::new();
    for (index, key) in tag_columns {
        if let Some(value) = record.get(*index) {
            if !value.is_empty() {
                tags.insert((*key).to_string(), value.to_string());
            }
        }
    }

    Some(NewAttraction {
        name: name.to_string(),
        category: source.category,
        source: Source::MichiganDnr,
        tags,
        latitude,
        longitude,
    })
}

/// Parses one CSV export into candidates.
///
/// Every record takes the source's fixed category. Rows with a blank name
/// or unparseable coordinates are skipped individually; only a missing
/// header or an unresolvable schema fails the source.
pub fn parse_source_csv(source: &DnrSource, body: &str) -> Result<Vec<NewAttraction>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(body.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| AppError::CsvError(format!("{}: {}", source.key, e)))?
        .clone();
    let schema = DnrSchema::resolve(&source.key, &headers)?;
    let tag_columns: Vec<(usize, &str)> = TAG_COLUMNS
        .iter()
        .filter_map(|(column, key)| {
            headers
                .iter()
                .position(|h| h == *column)
                .map(|index| (index, *key))
        })
        .collect();

    let mut parsed = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                debug!("Skipping {} row {}: {}", source.key, row_index + 1, e);
                continue;
            }
        };
        match parse_row(source, &schema, &tag_columns, &record) {
            Some(candidate) => parsed.push(candidate),
            None => debug!(
                "Skipping {} row {}: missing name or coordinates",
                source.key,
                row_index + 1
            ),
        }
    }
    Ok(parsed)
}

/// Client for DNR open-data CSV downloads.
pub struct DnrClient {
    client: reqwest::Client,
    http_timeout: Duration,
}

impl DnrClient {
    /// Creates a client from tuning settings.
    pub fn new(config: &DnrConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;
        Ok(Self {
            client,
            http_timeout: config.http_timeout,
        })
    }

    /// Downloads one source's CSV export and parses it.
    pub async fn load_source(&self, source: &DnrSource) -> Result<Vec<NewAttraction>, AppError> {
        let response = self
            .client
            .get(&source.url)
            .send()
            .await
            .map_err(|e| crate::map_transport_error(e, self.http_timeout))?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ClientError(format!(
                "HTTP {} from {}",
                status, source.url
            )));
        }
        let body = response
            .text()
            .await
            .map_err(|e| crate::map_transport_error(e, self.http_timeout))?;
        parse_source_csv(source, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mitten_core::Category;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn parks_source() -> DnrSource {
        DnrSource {
            key: "parks".to_string(),
            url: "https://example.com/parks.csv".to_string(),
            category: Category::ParksNature,
        }
    }

    fn trails_source(url: String) -> DnrSource {
        DnrSource {
            key: "trails".to_string(),
            url,
            category: Category::HikingBikingTrails,
        }
    }

    #[test]
    fn test_schema_prefers_earlier_alias() {
        let headers =
            csv::StringRecord::from(vec!["Trail_Name", "FACILITY", "Latitude", "Longitude"]);
        let schema = DnrSchema::resolve("parks", &headers).unwrap();

        // FACILITY outranks Trail_Name even though Trail_Name comes first
        // in the file
        assert_eq!(schema.name, 1);
        assert_eq!(schema.latitude, 2);
        assert_eq!(schema.longitude, 3);
    }

    #[test]
    fn test_schema_aliases_are_case_sensitive() {
        let headers = csv::StringRecord::from(vec!["facility", "LATITUDE", "LONGITUDE"]);
        let result = DnrSchema::resolve("parks", &headers);

        assert!(matches!(
            result,
            Err(AppError::SchemaResolution { role: "name", .. })
        ));
    }

    #[test]
    fn test_schema_missing_role_names_it() {
        let headers = csv::StringRecord::from(vec!["FACILITY", "LATITUDE"]);
        let err = DnrSchema::resolve("parks", &headers).unwrap_err();

        assert!(err.to_string().contains("longitude"));
        assert!(err.to_string().contains("parks"));
    }

    #[test]
    fn test_parse_state_park_export() {
        let body = "FACILITY,LATITUDE,LONGITUDE,ACRES\n\
                    Tahquamenon Falls State Park,46.6077,-85.2168,46179\n";
        let parsed = parse_source_csv(&parks_source(), body).unwrap();

        assert_eq!(parsed.len(), 1);
        let record = &parsed[0];
        assert_eq!(record.name, "Tahquamenon Falls State Park");
        assert_eq!(record.category, Category::ParksNature);
        assert_eq!(record.source.label(), "Michigan DNR");
        assert_eq!(record.latitude, 46.6077);
        assert_eq!(record.longitude, -85.2168);
        assert_eq!(record.tags.get("acres").unwrap(), "46179");
    }

    #[test]
    fn test_parse_skips_bad_rows() {
        let body = "FACILITY,LATITUDE,LONGITUDE\n\
                    Holland State Park,42.7726,-86.2049\n\
                    ,44.0,-85.0\n\
                    Bad Coords Park,not-a-number,-85.0\n\
                    NaN Park,NaN,-85.0\n";
        let parsed = parse_source_csv(&parks_source(), body).unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "Holland State Park");
    }

    #[test]
    fn test_parse_copies_tags_and_omits_empty() {
        let body = "FACILITY,LATITUDE,LONGITUDE,Type,ACRES\n\
                    Porcupine Mountains,46.7569,-89.7214,State Park,\n";
        let parsed = parse_source_csv(&parks_source(), body).unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].tags.get("type").unwrap(), "State Park");
        assert!(!parsed[0].tags.contains_key("acres"));
    }

    #[test]
    fn test_parse_trims_names() {
        let body = "FACILITY,LATITUDE,LONGITUDE\n\
                    \"  Ludington State Park  \",44.0255,-86.5069\n";
        let parsed = parse_source_csv(&parks_source(), body).unwrap();

        assert_eq!(parsed[0].name, "Ludington State Park");
    }

    #[tokio::test]
    async fn test_load_source_downloads_and_parses() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trails.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "Trail_Name,Latitude,Longitude,Length_Miles\n\
                 Fred Meijer Heartland Trail,43.3561,-85.0772,41.6\n",
            ))
            .mount(&server)
            .await;

        let client = DnrClient::new(&DnrConfig::default()).unwrap();
        let source = trails_source(format!("{}/trails.csv", server.uri()));
        let parsed = client.load_source(&source).await.unwrap();

        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "Fred Meijer Heartland Trail");
        assert_eq!(parsed[0].category, Category::HikingBikingTrails);
        assert_eq!(parsed[0].tags.get("length_miles").unwrap(), "41.6");
    }

    #[tokio::test]
    async fn test_load_source_reports_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/trails.csv"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = DnrClient::new(&DnrConfig::default()).unwrap();
        let source = trails_source(format!("{}/trails.csv", server.uri()));
        let result = client.load_source(&source).await;

        assert!(matches!(result, Err(AppError::ClientError(_))));
    }
}
