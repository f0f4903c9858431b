//! Overpass API client, query construction, and element parsing.

use mitten_core::category::registered_pairs;
use mitten_core::{
    classify, AppError, BoundingBox, Category, NewAttraction, OverpassConfig, RetryPolicy, Source,
    TagMap,
};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Top-level interpreter response.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<OverpassElement>,
}

/// One node, way, or relation from an interpreter response.
#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    pub id: u64,
    #[serde(rename = "type")]
    pub element_type: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: TagMap,
}

/// Centroid reported for ways and relations under `out center`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Builds an OverpassQL query for one bounding box.
///
/// With a category the query enumerates that category's registered pairs;
/// without one it casts a broad net over the keys the classifier can work
/// with. Either way the server returns JSON with centroids for non-node
/// elements, sorted by quadtile.
pub fn build_query(bounds: &BoundingBox, category: Option<Category>, timeout_secs: u32) -> String {
    let bbox = bounds.overpass_bounds();
    let body = match category {
        Some(category) => {
            let mut lines = Vec::new();
            for (key, value) in registered_pairs(category) {
                for kind in ["node", "way", "relation"] {
                    lines.push(format!("{}[\"{}\"=\"{}\"]({});", kind, key, value, bbox));
                }
            }
            lines.join("\n")
        }
        None => format!(
            "nwr[\"tourism\"]({0});\n nwr[\"leisure\"]({0});\n nwr[\"natural\"]({0});\n nwr[\"man_made\"]({0});",
            bbox
        ),
    };
    format!(
        "[out:json][timeout:{}];(\n{}\n);\nout center qt;",
        timeout_secs, body
    )
}

/// Converts raw elements into candidates, dropping what the pipeline
/// cannot use: nameless elements, elements without usable coordinates,
/// and elements the classifier rejects. With `category_filter` set,
/// candidates outside the requested category are dropped as well.
pub fn parse_elements(
    elements: Vec<OverpassElement>,
    category_filter: Option<Category>,
) -> Vec<NewAttraction> {
    let mut parsed = Vec::new();
    for element in elements {
        let Some(name) = element.tags.get("name").filter(|n| !n.is_empty()).cloned() else {
            continue;
        };
        let latitude = element.lat.or(element.center.map(|c| c.lat));
        let longitude = element.lon.or(element.center.map(|c| c.lon));
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            debug!(
                "Skipping {} {}: no usable coordinates",
                element.element_type, element.id
            );
            continue;
        };
        let Some(category) = classify(&element.tags) else {
            debug!(
                "Skipping {} {}: unclassifiable tags",
                element.element_type, element.id
            );
            continue;
        };
        if let Some(filter) = category_filter {
            if category != filter {
                continue;
            }
        }
        parsed.push(NewAttraction {
            name,
            category,
            source: Source::OpenStreetMap,
            tags: element.tags,
            latitude,
            longitude,
        });
    }
    parsed
}

/// Client for an Overpass interpreter endpoint.
pub struct OverpassClient {
    client: reqwest::Client,
    endpoint: Url,
    retry: RetryPolicy,
    query_timeout_secs: u32,
    http_timeout: Duration,
}

impl OverpassClient {
    /// Creates a client from tuning settings.
    pub fn new(config: &OverpassConfig) -> Result<Self, AppError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| AppError::InvalidUrl(format!("{}: {}", config.endpoint, e)))?;
        let client = reqwest::Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AppError::ClientError(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            retry: config.retry,
            query_timeout_secs: config.query_timeout_secs,
            http_timeout: config.http_timeout,
        })
    }

    /// Server-side budget to embed in queries built for this client.
    pub fn query_timeout_secs(&self) -> u32 {
        self.query_timeout_secs
    }

    /// Posts `query` to the interpreter and returns the decoded elements.
    ///
    /// Transient failures are retried with exponential backoff up to the
    /// configured attempt limit; the last error is returned once the
    /// budget is exhausted.
    pub async fn fetch_elements(&self, query: &str) -> Result<Vec<OverpassElement>, AppError> {
        let mut last_error = AppError::Generic("No attempts made".to_string());

        for attempt in 1..=self.retry.max_attempts {
            match self.attempt(query).await {
                Ok(elements) => return Ok(elements),
                Err(e) => {
                    last_error = e;
                    if !last_error.is_retryable() {
                        break;
                    }
                    if attempt < self.retry.max_attempts {
                        let delay = self.retry.delay_for(attempt);
                        debug!(
                            "Attempt {}/{} failed ({}), retrying in {:?}",
                            attempt, self.retry.max_attempts, last_error, delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error)
    }

    async fn attempt(&self, query: &str) -> Result<Vec<OverpassElement>, AppError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .body(query.to_string())
            .send()
            .await
            .map_err(|e| crate::map_transport_error(e, self.http_timeout))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(AppError::RateLimitExceeded);
        }
        if !status.is_success() {
            return Err(AppError::ClientError(format!(
                "HTTP {} from {}",
                status, self.endpoint
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| crate::map_transport_error(e, self.http_timeout))?;
        if body.trim().is_empty() {
            return Err(AppError::EmptyResponse);
        }
        let decoded: OverpassResponse = serde_json::from_str(&body)?;
        Ok(decoded.elements)
    }
}
