use thiserror::Error;

/// Application-wide error types.
///
/// This enum represents all possible errors that can occur in the Mitten
/// pipeline. It uses the `thiserror` crate for ergonomic error handling and
/// automatic conversion from underlying library errors.
///
/// # Error Conversion
///
/// Some errors automatically convert from their source types using the
/// `#[from]` attribute:
/// - `std::io::Error` → `AppError::Io`
/// - `serde_json::Error` → `AppError::SerializationError`
///
/// HTTP and CSV failures are mapped manually at the call site so the variant
/// can carry the context that matters (status code, source key, row index).
///
/// # Examples
///
/// ```no_run
/// use mitten_core::error::AppError;
///
/// fn example() -> Result<(), AppError> {
///     Err(AppError::Generic("Something went wrong".to_string()))
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Reading or writing the attraction store failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client request failed.
    ///
    /// This error occurs when HTTP requests fail due to connection problems,
    /// server errors, or unexpected status codes.
    #[error("API Client error: {0}")]
    ClientError(String),

    /// CSV reading failed for a tabular source.
    #[error("CSV error: {0}")]
    CsvError(String),

    /// A tabular source's header has no column for a required role.
    ///
    /// The whole source is rejected rather than partially parsed, so a
    /// schema drift upstream cannot silently produce half-empty records.
    #[error("Source '{source_key}' has no recognizable {role} column")]
    SchemaResolution {
        source_key: String,
        role: &'static str,
    },

    /// JSON serialization or deserialization failed.
    ///
    /// This error occurs when converting between Rust types and JSON,
    /// typically when parsing API responses or writing the store file.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// API response contained no data.
    ///
    /// This error occurs when an API returns a successful status but
    /// the response body is empty. The public Overpass endpoint does this
    /// under load, so it is treated like any other transient failure.
    #[error("Empty response from API")]
    EmptyResponse,

    /// Network or connection error.
    ///
    /// This error occurs when a request fails due to connectivity issues,
    /// DNS resolution failures, or the remote server being unreachable.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Request timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded. Please wait and try again.")]
    RateLimitExceeded,

    /// Region name did not match any fixed region.
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// Category name did not match any label or slug.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// City name did not match the built-in city table.
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    /// Reading or parsing a sources.toml file failed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic application error for cases not covered by specific variants.
    ///
    /// Use this sparingly - prefer creating specific error variants
    /// for better error handling and debugging.
    #[error("Error: {0}")]
    Generic(String),
}

impl AppError {
    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Io(e) => {
                format!(
                    "Store I/O error: {}\n   Check that the store path is writable.",
                    e
                )
            }
            AppError::ClientError(msg) => {
                if msg.contains("timeout") || msg.contains("timed out") {
                    "Request timed out. The service may be slow or unreachable.\n   Try again later.".to_string()
                } else if msg.contains("connect") {
                    format!("Cannot connect to the data source: {}\n   Check your internet connection.", msg)
                } else {
                    format!("API error: {}", msg)
                }
            }
            AppError::SchemaResolution { source_key, role } => {
                format!(
                    "Source '{}' has no recognizable {} column.\n   Check that the download URL still points at the expected dataset.",
                    source_key, role
                )
            }
            AppError::NetworkError(msg) => {
                format!("Network error: {}\n   Check your internet connection.", msg)
            }
            AppError::Timeout(secs) => {
                format!("Request timed out after {} seconds.\n   The server may be overloaded. Try again later.", secs)
            }
            AppError::RateLimitExceeded => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            AppError::EmptyResponse => {
                "The API returned no data. The service may be busy; try again later.".to_string()
            }
            AppError::UnknownRegion(name) => {
                format!(
                    "Unknown region: {}\n   Valid regions: upper-peninsula, lower-peninsula, entire-state.",
                    name
                )
            }
            AppError::UnknownCategory(name) => {
                format!(
                    "Unknown category: {}\n   Use a label like \"Parks & Nature\" or a slug like parks-nature.",
                    name
                )
            }
            AppError::UnknownCity(name) => {
                let available: Vec<&str> =
                    crate::region::CITIES.iter().map(|c| c.name).collect();
                format!(
                    "Unknown city: {}\n   Available: {}",
                    name,
                    available.join(", ")
                )
            }
            AppError::ConfigError(msg) => {
                format!(
                    "Configuration error: {}\n   Check your sources.toml syntax.",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Covers the transient remote-failure family: transport errors, bad
    /// statuses, empty bodies, and unparsable bodies. The Overpass fetch
    /// loop consults this before sleeping on a backoff.
    ///
    /// # Examples
    ///
    /// ```
    /// use mitten_core::error::AppError;
    ///
    /// // Network errors are retryable
    /// let err = AppError::NetworkError("connection reset".to_string());
    /// assert!(err.is_retryable());
    ///
    /// // Rate limits are retryable (after a delay)
    /// let err = AppError::RateLimitExceeded;
    /// assert!(err.is_retryable());
    ///
    /// // An unknown region is NOT retryable
    /// let err = AppError::UnknownRegion("atlantis".to_string());
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::NetworkError(_)
                | AppError::Timeout(_)
                | AppError::RateLimitExceeded
                | AppError::ClientError(_)
                | AppError::EmptyResponse
                | AppError::SerializationError(_)
        )
    }
}
