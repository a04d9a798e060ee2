//! Geocoding gateway error types.

/// Errors from the reverse geocoding service.
#[derive(Debug, thiserror::Error)]
pub enum GeocodingError {
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

    /// The service found nothing at this coordinate
    #[error("no geocoding results")]
    NoResults,

    /// Rate limited by the service
    #[error("rate limited by geocoding service")]
    RateLimited,

    /// Credential rejected or API not enabled
    #[error("request denied: {0}")]
    Denied(String),

    /// Any other non-OK service status
    #[error("geocoding service returned {status}")]
    Service {
        status: String,
        message: Option<String>,
    },

    /// Client could not be built from its configuration
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for GeocodingError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}
