//! Failures surfaced to the presentation surface.
//!
//! Gateway errors are logged where they happen and then folded into a
//! [`TripFault`] on the trip state, so the screen can offer a retry or a
//! dismissible notice instead of silently staying degraded.

use serde::Serialize;

use crate::directions::DirectionsError;
use crate::geocoding::GeocodingError;
use crate::location::LocationError;

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FaultKind {
    PermissionDenied,
    LocationUnavailable,
    GeocodingError,
    RouteUnavailable,
}

/// How the user can recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Recovery {
    /// Re-run the location pipeline.
    Retry,
    /// Acknowledge and carry on.
    Dismiss,
}

/// A failure the user should see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripFault {
    pub kind: FaultKind,
    pub message: String,
}

impl TripFault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn permission_denied() -> Self {
        Self::new(
            FaultKind::PermissionDenied,
            LocationError::PermissionDenied.to_string(),
        )
    }

    pub fn from_location(err: &LocationError) -> Self {
        let kind = match err {
            LocationError::PermissionDenied => FaultKind::PermissionDenied,
            LocationError::Unavailable { .. } | LocationError::TimedOut { .. } => {
                FaultKind::LocationUnavailable
            }
        };
        Self::new(kind, err.to_string())
    }

    pub fn from_geocoding(err: &GeocodingError) -> Self {
        Self::new(FaultKind::GeocodingError, err.to_string())
    }

    pub fn from_directions(err: &DirectionsError) -> Self {
        Self::new(FaultKind::RouteUnavailable, err.to_string())
    }

    /// Location-side faults are retried; a failed route is just dismissed.
    pub fn recovery(&self) -> Recovery {
        match self.kind {
            FaultKind::RouteUnavailable => Recovery::Dismiss,
            FaultKind::PermissionDenied
            | FaultKind::LocationUnavailable
            | FaultKind::GeocodingError => Recovery::Retry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn location_errors_classified() {
        let fault = TripFault::from_location(&LocationError::PermissionDenied);
        assert_eq!(fault.kind, FaultKind::PermissionDenied);

        let fault = TripFault::from_location(&LocationError::TimedOut {
            after: Duration::from_secs(15),
        });
        assert_eq!(fault.kind, FaultKind::LocationUnavailable);
        assert_eq!(fault.message, "location request timed out after 15s");
        assert_eq!(fault.recovery(), Recovery::Retry);
    }

    #[test]
    fn route_faults_are_dismissed() {
        let fault = TripFault::from_directions(&DirectionsError::NoRoute);
        assert_eq!(fault.kind, FaultKind::RouteUnavailable);
        assert_eq!(fault.recovery(), Recovery::Dismiss);
    }

    #[test]
    fn geocoding_faults_are_retried() {
        let fault = TripFault::from_geocoding(&GeocodingError::NoResults);
        assert_eq!(fault.kind, FaultKind::GeocodingError);
        assert_eq!(fault.message, "no geocoding results");
        assert_eq!(fault.recovery(), Recovery::Retry);
    }
}
