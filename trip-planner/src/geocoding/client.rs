//! Reverse geocoding HTTP client.
//!
//! Talks to the Maps Geocoding web service. The credential is part of the
//! client's configuration and lives exactly as long as the client.

use std::future::Future;

use tracing::debug;

use crate::config::MAPS_API_BASE_URL;
use crate::geo::{Coordinate, PlaceLabel};

use super::error::GeocodingError;
use super::types::{GeocodeResponse, GeocodeResult};

/// Resolves coordinates to a human-readable place label.
///
/// This abstraction allows the trip coordinator to be tested with mock data.
pub trait ReverseGeocoder: Send + Sync {
    /// Look up the label of the place at `coordinate`.
    fn reverse_geocode(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = Result<PlaceLabel, GeocodingError>> + Send;
}

/// Configuration for the geocoding client.
#[derive(Clone)]
pub struct GeocodingConfig {
    /// API key sent with every request
    pub api_key: String,
    /// Base URL for the API (defaults to the production Maps API)
    pub base_url: String,
    /// Preferred language for formatted addresses
    pub language: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeocodingConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: MAPS_API_BASE_URL.to_string(),
            language: None,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the response language, e.g. `"pt-BR"`.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl std::fmt::Debug for GeocodingConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Maps Geocoding API client.
#[derive(Clone)]
pub struct GeocodingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    language: Option<String>,
}

impl GeocodingClient {
    /// Create a new geocoding client with the given configuration.
    pub fn new(config: GeocodingConfig) -> Result<Self, GeocodingError> {
        if config.api_key.trim().is_empty() {
            return Err(GeocodingError::NotConfigured(
                "API key must not be empty".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            language: config.language,
        })
    }

    /// Fetch every candidate address for a coordinate, best match first.
    ///
    /// Returns `NoResults` rather than an empty list.
    pub async fn lookup(
        &self,
        coordinate: Coordinate,
    ) -> Result<Vec<GeocodeResult>, GeocodingError> {
        let url = format!("{}/geocode/json", self.base_url);

        let mut query = vec![
            ("latlng", coordinate.to_query_param()),
            ("key", self.api_key.clone()),
        ];
        if let Some(language) = &self.language {
            query.push(("language", language.clone()));
        }

        let response = self.http.get(&url).query(&query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodingError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| GeocodingError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        check_status(&parsed)?;

        if parsed.results.is_empty() {
            return Err(GeocodingError::NoResults);
        }

        debug!(
            %coordinate,
            results = parsed.results.len(),
            "reverse geocode succeeded"
        );

        Ok(parsed.results)
    }
}

impl ReverseGeocoder for GeocodingClient {
    /// Only the first result is used.
    async fn reverse_geocode(&self, coordinate: Coordinate) -> Result<PlaceLabel, GeocodingError> {
        let results = self.lookup(coordinate).await?;
        let best = results.first().ok_or(GeocodingError::NoResults)?;
        Ok(PlaceLabel::from_formatted_address(&best.formatted_address))
    }
}

/// Map the service-level status field to an error.
fn check_status(response: &GeocodeResponse) -> Result<(), GeocodingError> {
    match response.status.as_str() {
        "OK" => Ok(()),
        "ZERO_RESULTS" => Err(GeocodingError::NoResults),
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => Err(GeocodingError::RateLimited),
        "REQUEST_DENIED" => Err(GeocodingError::Denied(
            response
                .error_message
                .clone()
                .unwrap_or_else(|| "request denied".to_string()),
        )),
        other => Err(GeocodingError::Service {
            status: other.to_string(),
            message: response.error_message.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: &str, error_message: Option<&str>) -> GeocodeResponse {
        GeocodeResponse {
            status: status.to_string(),
            results: Vec::new(),
            error_message: error_message.map(String::from),
        }
    }

    #[test]
    fn config_builder() {
        let config = GeocodingConfig::new("test-key")
            .with_base_url("http://localhost:8080")
            .with_language("pt-BR")
            .with_timeout(5);

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.language.as_deref(), Some("pt-BR"));
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn config_defaults() {
        let config = GeocodingConfig::new("test-key");
        assert_eq!(config.base_url, MAPS_API_BASE_URL);
        assert_eq!(config.language, None);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn debug_redacts_key() {
        let config = GeocodingConfig::new("super-secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn client_creation() {
        assert!(GeocodingClient::new(GeocodingConfig::new("test-key")).is_ok());
    }

    #[test]
    fn empty_key_rejected() {
        let result = GeocodingClient::new(GeocodingConfig::new("  "));
        assert!(matches!(result, Err(GeocodingError::NotConfigured(_))));
    }

    #[test]
    fn status_mapping() {
        assert!(check_status(&response("OK", None)).is_ok());
        assert!(matches!(
            check_status(&response("ZERO_RESULTS", None)),
            Err(GeocodingError::NoResults)
        ));
        assert!(matches!(
            check_status(&response("OVER_QUERY_LIMIT", None)),
            Err(GeocodingError::RateLimited)
        ));
        assert!(matches!(
            check_status(&response("REQUEST_DENIED", Some("bad key"))),
            Err(GeocodingError::Denied(msg)) if msg == "bad key"
        ));
        assert!(matches!(
            check_status(&response("INVALID_REQUEST", None)),
            Err(GeocodingError::Service { status, .. }) if status == "INVALID_REQUEST"
        ));
    }
}
