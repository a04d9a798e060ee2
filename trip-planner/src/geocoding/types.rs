//! Geocoding API response types.
//!
//! Only the fields the planner reads are modelled; everything else in the
//! response is ignored during deserialization.

use serde::Deserialize;

/// Top-level reverse geocoding response.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    /// `"OK"`, `"ZERO_RESULTS"`, `"OVER_QUERY_LIMIT"`, `"REQUEST_DENIED"`, ...
    pub status: String,

    /// Results, best match first.
    #[serde(default)]
    pub results: Vec<GeocodeResult>,

    /// Human-readable detail for non-OK statuses.
    pub error_message: Option<String>,
}

/// One candidate address for the queried coordinate.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
}
