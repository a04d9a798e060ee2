//! Trip planner configuration.

use crate::camera::EdgePadding;
use crate::fare::FareRate;
use crate::geo::{Coordinate, DEFAULT_LATITUDE_DELTA, DestinationSelection, Viewport};
use crate::location::LocationOptions;

/// Default base URL for the Maps web services.
pub const MAPS_API_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Environment variable holding the Maps API key.
pub const API_KEY_ENV: &str = "MAPS_API_KEY";

/// Environment variable holding the fixed origin as `lat,lng`.
pub const TRIP_ORIGIN_ENV: &str = "TRIP_ORIGIN";

/// Errors loading configuration at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty
    #[error("{0} is not set")]
    MissingVar(&'static str),

    /// A value could not be parsed
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Read the Maps API key from [`API_KEY_ENV`].
pub fn api_key_from_env() -> Result<String, ConfigError> {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(ConfigError::MissingVar(API_KEY_ENV)),
    }
}

/// Read the fixed origin from [`TRIP_ORIGIN_ENV`].
pub fn origin_from_env() -> Result<Coordinate, ConfigError> {
    let value =
        std::env::var(TRIP_ORIGIN_ENV).map_err(|_| ConfigError::MissingVar(TRIP_ORIGIN_ENV))?;
    parse_coordinate(TRIP_ORIGIN_ENV, &value)
}

/// Parse `lat,lng`.
pub fn parse_coordinate(name: &'static str, value: &str) -> Result<Coordinate, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid { name, reason };

    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| invalid(format!("expected lat,lng, got {value:?}")))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| invalid(format!("bad latitude {lat:?}")))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| invalid(format!("bad longitude {lng:?}")))?;

    Coordinate::new(lat, lng).map_err(|err| invalid(err.to_string()))
}

/// Parse `lat,lng,title` into a place search pick. The title may itself
/// contain commas.
pub fn parse_destination(
    name: &'static str,
    value: &str,
) -> Result<DestinationSelection, ConfigError> {
    let mut parts = value.splitn(3, ',');
    let (Some(lat), Some(lng), Some(title)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ConfigError::Invalid {
            name,
            reason: format!("expected lat,lng,title, got {value:?}"),
        });
    };

    let coordinate = parse_coordinate(name, &format!("{lat},{lng}"))?;
    let title = title.trim();
    if title.is_empty() {
        return Err(ConfigError::Invalid {
            name,
            reason: "empty title".into(),
        });
    }

    Ok(DestinationSelection::new(
        title,
        coordinate.latitude(),
        coordinate.longitude(),
    ))
}

/// Configuration for the trip coordinator.
#[derive(Debug, Clone)]
pub struct TripConfig {
    /// Map viewport the regions and padding are computed for.
    pub viewport: Viewport,

    /// Latitude span of the region shown around the origin.
    pub latitude_delta: f64,

    /// Price per minute of travel.
    pub fare_rate: FareRate,

    /// Camera padding around a fitted route, before pixel scaling.
    pub padding: EdgePadding,

    /// Options for the one-shot location request.
    pub location: LocationOptions,
}

impl TripConfig {
    /// Create a configuration for the given viewport with default values.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn with_latitude_delta(mut self, delta: f64) -> Self {
        self.latitude_delta = delta;
        self
    }

    pub fn with_fare_rate(mut self, rate: FareRate) -> Self {
        self.fare_rate = rate;
        self
    }

    pub fn with_padding(mut self, padding: EdgePadding) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_location_options(mut self, options: LocationOptions) -> Self {
        self.location = options;
        self
    }
}

impl Default for TripConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            latitude_delta: DEFAULT_LATITUDE_DELTA,
            fare_rate: FareRate::default(),
            padding: EdgePadding::default(),
            location: LocationOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_config() {
        let config = TripConfig::default();

        assert_eq!(config.latitude_delta, 0.0922);
        assert_eq!(config.fare_rate.cents_per_minute(), 123);
        assert_eq!(config.padding.right, 350.0);
        assert_eq!(config.location.timeout, Duration::from_secs(15));
        assert_eq!(config.location.max_age, Duration::from_secs(10));
    }

    #[test]
    fn custom_config() {
        let config = TripConfig::new(Viewport::new(300.0, 600.0))
            .with_latitude_delta(0.05)
            .with_fare_rate(FareRate::from_cents_per_minute(200))
            .with_location_options(LocationOptions::default().with_high_accuracy(false));

        assert_eq!(config.viewport.width, 300.0);
        assert_eq!(config.latitude_delta, 0.05);
        assert_eq!(config.fare_rate.cents_per_minute(), 200);
        assert!(!config.location.high_accuracy);
    }

    #[test]
    fn parses_origin() {
        let origin = parse_coordinate(TRIP_ORIGIN_ENV, "37.7749, -122.4194").unwrap();
        assert_eq!(origin, Coordinate::new(37.7749, -122.4194).unwrap());

        assert!(matches!(
            parse_coordinate(TRIP_ORIGIN_ENV, "37.7749"),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(parse_coordinate(TRIP_ORIGIN_ENV, "north,-122.4").is_err());
        assert!(parse_coordinate(TRIP_ORIGIN_ENV, "95.0,0.0").is_err());
    }

    #[test]
    fn parses_destination_with_commas_in_title() {
        let selection =
            parse_destination("destination", "37.8044,-122.2712,Oakland, CA").unwrap();
        let destination = selection.into_destination().unwrap();

        assert_eq!(destination.title(), "Oakland, CA");
        assert_eq!(destination.coordinate().latitude(), 37.8044);

        assert!(parse_destination("destination", "37.8044,-122.2712").is_err());
        assert!(parse_destination("destination", "37.8044,-122.2712,  ").is_err());
    }

    #[test]
    fn error_display() {
        assert_eq!(
            ConfigError::MissingVar(API_KEY_ENV).to_string(),
            "MAPS_API_KEY is not set"
        );

        let err = ConfigError::Invalid {
            name: "TRIP_ORIGIN",
            reason: "expected lat,lng".into(),
        };
        assert_eq!(err.to_string(), "invalid TRIP_ORIGIN: expected lat,lng");
    }
}
