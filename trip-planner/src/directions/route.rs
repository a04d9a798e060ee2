//! Route results.

use std::fmt;

use serde::Serialize;

use crate::geo::Coordinate;

use super::error::DirectionsError;
use super::polyline;
use super::types::{ApiRoute, DirectionsResponse};

/// How the route is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path and travel time between an origin and a destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub path: Vec<Coordinate>,
    pub duration_seconds: f64,
}

impl RouteResult {
    pub fn new(path: Vec<Coordinate>, duration_seconds: f64) -> Self {
        Self {
            path,
            duration_seconds,
        }
    }

    /// Build a route from a service response, using its first route.
    pub fn from_response(response: &DirectionsResponse) -> Result<Self, DirectionsError> {
        check_status(response)?;
        let route = response.routes.first().ok_or(DirectionsError::NoRoute)?;
        Self::from_api_route(route)
    }

    /// Duration is the sum over all legs. The path is every step's
    /// geometry in order, falling back to the overview polyline.
    fn from_api_route(route: &ApiRoute) -> Result<Self, DirectionsError> {
        let duration_seconds = route.legs.iter().map(|leg| leg.duration.value).sum();

        let mut path = Vec::new();
        for step in route.legs.iter().flat_map(|leg| &leg.steps) {
            if let Some(encoded) = &step.polyline {
                path.extend(polyline::decode(&encoded.points)?);
            }
        }

        if path.is_empty()
            && let Some(overview) = &route.overview_polyline
        {
            path = polyline::decode(&overview.points)?;
        }

        if path.is_empty() {
            return Err(DirectionsError::NoRoute);
        }

        Ok(Self {
            path,
            duration_seconds,
        })
    }
}

/// Map the service-level status field to an error.
fn check_status(response: &DirectionsResponse) -> Result<(), DirectionsError> {
    match response.status.as_str() {
        "OK" => Ok(()),
        "ZERO_RESULTS" | "NOT_FOUND" => Err(DirectionsError::NoRoute),
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => Err(DirectionsError::RateLimited),
        "REQUEST_DENIED" => Err(DirectionsError::Denied(
            response
                .error_message
                .clone()
                .unwrap_or_else(|| "request denied".to_string()),
        )),
        other => Err(DirectionsError::Service {
            status: other.to_string(),
            message: response.error_message.clone(),
        }),
    }
}
