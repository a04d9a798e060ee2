//! Directions HTTP client.

use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::MAPS_API_BASE_URL;
use crate::geo::{Coordinate, Destination, Region};

use super::error::DirectionsError;
use super::route::{RouteResult, TravelMode};
use super::types::DirectionsResponse;

/// Computes routes between two points.
///
/// This abstraction allows the trip coordinator to be tested with mock data.
pub trait RouteProvider: Send + Sync {
    /// Get a route from the origin region's centre to the destination.
    ///
    /// Implementations should stop work and return `Cancelled` once
    /// `cancel` fires.
    fn get_route(
        &self,
        origin: &Region,
        destination: &Destination,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<RouteResult, DirectionsError>> + Send;
}

/// Configuration for the directions client.
#[derive(Clone)]
pub struct DirectionsConfig {
    /// API key sent with every request
    pub api_key: String,
    /// Base URL for the API (defaults to the production Maps API)
    pub base_url: String,
    /// Travel mode for all requests
    pub mode: TravelMode,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DirectionsConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: MAPS_API_BASE_URL.to_string(),
            mode: TravelMode::default(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the travel mode.
    pub fn with_mode(mut self, mode: TravelMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl std::fmt::Debug for DirectionsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectionsConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("mode", &self.mode)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Maps Directions API client.
#[derive(Clone)]
pub struct DirectionsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    mode: TravelMode,
}

impl DirectionsClient {
    /// Create a new directions client with the given configuration.
    pub fn new(config: DirectionsConfig) -> Result<Self, DirectionsError> {
        if config.api_key.trim().is_empty() {
            return Err(DirectionsError::NotConfigured(
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
            mode: config.mode,
        })
    }

    /// Fetch and decode the recommended route between two points.
    pub async fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteResult, DirectionsError> {
        let url = format!("{}/directions/json", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("origin", origin.to_query_param()),
                ("destination", destination.to_query_param()),
                ("mode", self.mode.as_str().to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DirectionsError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectionsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let parsed: DirectionsResponse =
            serde_json::from_str(&body).map_err(|e| DirectionsError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        let route = RouteResult::from_response(&parsed)?;

        debug!(
            %origin,
            %destination,
            points = route.path.len(),
            duration_seconds = route.duration_seconds,
            "route fetched"
        );

        Ok(route)
    }
}

impl RouteProvider for DirectionsClient {
    /// Dropping the in-flight request on cancellation aborts it.
    async fn get_route(
        &self,
        origin: &Region,
        destination: &Destination,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, DirectionsError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DirectionsError::Cancelled),
            route = self.fetch_route(origin.center, destination.coordinate()) => route,
        }
    }
}
