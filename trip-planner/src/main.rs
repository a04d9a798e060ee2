use std::process::ExitCode;

use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use trip_planner::cache::{CachedGeocoder, GeocodeCacheConfig};
use trip_planner::config::{self, ConfigError, TripConfig};
use trip_planner::directions::{DirectionsClient, DirectionsConfig, DirectionsError};
use trip_planner::geocoding::{GeocodingClient, GeocodingConfig, GeocodingError};
use trip_planner::location::{DeviceLocationProvider, FixedPositionSource, FreshFix};
use trip_planner::trip::{TripClosed, TripCoordinator, TripPhase, UiEvent};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Geocoding(#[from] GeocodingError),
    #[error(transparent)]
    Directions(#[from] DirectionsError),
    #[error(transparent)]
    Closed(#[from] TripClosed),
    #[error("coordinator task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!(error = %err, "trip planner failed");
            ExitCode::FAILURE
        }
    }
}

/// Run one trip. Returns whether it ended en route.
async fn run() -> Result<bool, AppError> {
    let api_key = config::api_key_from_env()?;
    let origin = config::origin_from_env()?;
    let destination = std::env::args()
        .nth(1)
        .ok_or(ConfigError::MissingVar("destination argument"))?;
    let selection = config::parse_destination("destination argument", &destination)?;

    let trip_config = TripConfig::default();
    let location = DeviceLocationProvider::new(
        FixedPositionSource::granted(FreshFix::At(origin)),
        trip_config.location,
    );
    let geocoder = CachedGeocoder::new(
        GeocodingClient::new(GeocodingConfig::new(&api_key))?,
        &GeocodeCacheConfig::default(),
    );
    let router = DirectionsClient::new(DirectionsConfig::new(&api_key))?;

    let (mut handle, task) =
        TripCoordinator::new(trip_config, location, geocoder, router).spawn();

    let state = handle
        .wait_for(|state| state.origin_region().is_some() || state.fault().is_some())
        .await?;

    if state.origin_region().is_some() {
        info!(destination = %destination, "origin ready, selecting destination");
        handle.send(UiEvent::DestinationSelected(selection)).await?;
        handle
            .wait_for(|state| {
                state.phase() == TripPhase::EnRoute
                    || (state.phase() == TripPhase::Ready && state.fault().is_some())
            })
            .await?;
    }

    let camera_fit = handle.try_next_camera_fit();
    drop(handle);
    let state = task.await?;

    let output = json!({
        "state": state,
        "cameraFit": camera_fit,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(state.phase() == TripPhase::EnRoute)
}
