//! Directions API response types.

use serde::Deserialize;

/// Top-level directions response.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// `"OK"`, `"ZERO_RESULTS"`, `"NOT_FOUND"`, `"REQUEST_DENIED"`, ...
    pub status: String,

    #[serde(default)]
    pub routes: Vec<ApiRoute>,

    pub error_message: Option<String>,
}

/// One candidate route. The first is the recommended one.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRoute {
    #[serde(default)]
    pub legs: Vec<ApiLeg>,

    pub overview_polyline: Option<EncodedPolyline>,
}

/// Section of a route between two waypoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiLeg {
    pub duration: TextValue,

    #[serde(default)]
    pub steps: Vec<ApiStep>,
}

/// A single manoeuvre within a leg.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiStep {
    pub polyline: Option<EncodedPolyline>,
}

/// Numeric part of a `{ "text": "25 mins", "value": 1500 }` pair.
#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncodedPolyline {
    pub points: String,
}
