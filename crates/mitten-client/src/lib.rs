//! HTTP clients for the Mitten harvester.
//!
//! [`OverpassClient`] posts OverpassQL queries to an interpreter endpoint
//! and decodes the element stream. [`DnrClient`] downloads Michigan DNR
//! CSV exports and parses them against their resolved schemas.

pub mod dnr;
pub mod overpass;

pub use dnr::DnrClient;
pub use overpass::OverpassClient;

use mitten_core::AppError;
use std::time::Duration;

/// User agent sent on every outbound request.
pub(crate) const USER_AGENT: &str = "Mitten/0.1 (michigan-attractions-harvester)";

/// Maps transport-level reqwest failures onto our error variants.
pub(crate) fn map_transport_error(e: reqwest::Error, timeout: Duration) -> AppError {
    if e.is_timeout() {
        AppError::Timeout(timeout.as_secs())
    } else if e.is_connect() {
        AppError::NetworkError(format!("Connection failed: {}", e))
    } else {
        AppError::ClientError(e.to_string())
    }
}
