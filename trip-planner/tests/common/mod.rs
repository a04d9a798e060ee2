//! Shared test doubles for coordinator integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use trip_planner::config::TripConfig;
use trip_planner::directions::{DirectionsError, RouteProvider, RouteResult};
use trip_planner::geo::{
    Coordinate, Destination, DestinationSelection, Geometry, LatLng, PlaceLabel, Region,
    StructuredFormatting, Viewport,
};
use trip_planner::geocoding::{GeocodingError, ReverseGeocoder};
use trip_planner::location::{DeviceLocationProvider, FixedPositionSource, LocationOptions};
use trip_planner::trip::{TripHandle, TripState};

/// Generous upper bound for anything a test waits on. Time is paused in
/// these tests, so this only fires when the coordinator is stuck.
pub const SETTLE: Duration = Duration::from_secs(120);

pub fn c(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).unwrap()
}

pub fn sf() -> Coordinate {
    c(37.7749, -122.4194)
}

pub fn oakland() -> DestinationSelection {
    DestinationSelection::new("Oakland", 37.8044, -122.2712)
}

/// Built field by field, the way a widget bridge assembles the payload.
pub fn berkeley() -> DestinationSelection {
    DestinationSelection {
        structured_formatting: StructuredFormatting {
            main_text: "Berkeley".to_string(),
        },
        geometry: Geometry {
            location: LatLng {
                lat: 37.8715,
                lng: -122.2730,
            },
        },
    }
}

pub fn oakland_path() -> Vec<Coordinate> {
    vec![sf(), c(37.80, -122.35), c(37.8044, -122.2712)]
}

pub fn berkeley_path() -> Vec<Coordinate> {
    vec![sf(), c(37.85, -122.30), c(37.8715, -122.2730)]
}

pub fn config() -> TripConfig {
    TripConfig::new(Viewport::new(400.0, 800.0))
}

pub fn location(source: FixedPositionSource) -> DeviceLocationProvider<FixedPositionSource> {
    DeviceLocationProvider::new(source, LocationOptions::default())
}

/// Wait until the published state satisfies `predicate`, failing the test
/// if it never does.
pub async fn settle(
    handle: &mut TripHandle,
    predicate: impl FnMut(&TripState) -> bool,
) -> TripState {
    tokio::time::timeout(SETTLE, handle.wait_for(predicate))
        .await
        .expect("trip state never settled")
        .expect("coordinator stopped")
}

/// Geocoder that always answers with the same formatted address, or fails.
#[derive(Clone)]
pub struct StaticGeocoder {
    address: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl StaticGeocoder {
    pub fn answering(address: &str) -> Self {
        Self {
            address: Some(address.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            address: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReverseGeocoder for StaticGeocoder {
    async fn reverse_geocode(&self, _coordinate: Coordinate) -> Result<PlaceLabel, GeocodingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.address {
            Some(address) => Ok(PlaceLabel::from_formatted_address(address)),
            None => Err(GeocodingError::NoResults),
        }
    }
}

/// What the scripted router answers for one destination.
#[derive(Debug, Clone)]
pub enum Scripted {
    Route(RouteResult),
    NoRoute,
}

/// Router with a scripted answer and latency per destination title.
///
/// Honours cancellation the way the HTTP client does.
#[derive(Clone, Default)]
pub struct ScriptedRouter {
    answers: HashMap<String, (Duration, Scripted)>,
    calls: Arc<AtomicUsize>,
    cancelled: Arc<AtomicUsize>,
}

impl ScriptedRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, title: &str, delay: Duration, route: RouteResult) -> Self {
        self.answers
            .insert(title.to_string(), (delay, Scripted::Route(route)));
        self
    }

    pub fn with_no_route(mut self, title: &str, delay: Duration) -> Self {
        self.answers
            .insert(title.to_string(), (delay, Scripted::NoRoute));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl RouteProvider for ScriptedRouter {
    async fn get_route(
        &self,
        _origin: &Region,
        destination: &Destination,
        cancel: &CancellationToken,
    ) -> Result<RouteResult, DirectionsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let Some((delay, answer)) = self.answers.get(destination.title()).cloned() else {
            return Err(DirectionsError::NoRoute);
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                self.cancelled.fetch_add(1, Ordering::SeqCst);
                Err(DirectionsError::Cancelled)
            }
            _ = tokio::time::sleep(delay) => match answer {
                Scripted::Route(route) => Ok(route),
                Scripted::NoRoute => Err(DirectionsError::NoRoute),
            },
        }
    }
}
