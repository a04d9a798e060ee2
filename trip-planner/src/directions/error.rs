//! Directions gateway error types.

use super::polyline::PolylineError;

/// Errors from the directions service.
///
/// Every variant means the route is unavailable for this request; the
/// distinction only matters for logging and retry decisions.
#[derive(Debug, thiserror::Error)]
pub enum DirectionsError {
    /// HTTP request failed (network error, timeout, etc.)
    ///
    /// The request URL is stripped on conversion, since it carries the API key.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// Service returned a non-success HTTP status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// No path exists between origin and destination
    #[error("no route between origin and destination")]
    NoRoute,

    /// Rate limited by the service
    #[error("rate limited by directions service")]
    RateLimited,

    /// Credential rejected or API not enabled
    #[error("request denied: {0}")]
    Denied(String),

    /// Any other non-OK service status
    #[error("directions service returned {status}")]
    Service {
        status: String,
        message: Option<String>,
    },

    /// Route geometry could not be decoded
    #[error("bad route geometry: {0}")]
    Polyline(#[from] PolylineError),

    /// Request was superseded before it completed
    #[error("route request cancelled")]
    Cancelled,

    /// Client could not be built from its configuration
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for DirectionsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(
            DirectionsError::NoRoute.to_string(),
            "no route between origin and destination"
        );
        assert_eq!(
            DirectionsError::Cancelled.to_string(),
            "route request cancelled"
        );

        let err = DirectionsError::Polyline(PolylineError::Truncated);
        assert_eq!(
            err.to_string(),
            "bad route geometry: polyline ends in the middle of a value"
        );

        let err = DirectionsError::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error 503: unavailable");
    }
}
