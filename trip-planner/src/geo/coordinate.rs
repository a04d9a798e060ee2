//! Latitude/longitude pairs.

use std::fmt;

use serde::Serialize;

/// Error returned when constructing a coordinate outside the valid ranges.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinate: {reason}")]
pub struct InvalidCoordinate {
    reason: &'static str,
}

/// A point on the globe in decimal degrees.
///
/// Latitude is always within `[-90, 90]` and longitude within `[-180, 180]`.
///
/// # Examples
///
/// ```
/// use trip_planner::geo::Coordinate;
///
/// let sf = Coordinate::new(37.7749, -122.4194).unwrap();
/// assert_eq!(sf.latitude(), 37.7749);
///
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// assert!(Coordinate::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, validating both components.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinate> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(InvalidCoordinate {
                reason: "components must be finite",
            });
        }

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinate {
                reason: "latitude must be within [-90, 90]",
            });
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinate {
                reason: "longitude must be within [-180, 180]",
            });
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Format as `"lat,lng"`, the form the Maps web services expect.
    pub fn to_query_param(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundaries() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinate::new(90.0001, 0.0).is_err());
        assert!(Coordinate::new(-91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, 180.5).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn query_param_format() {
        let c = Coordinate::new(37.8044, -122.2712).unwrap();
        assert_eq!(c.to_query_param(), "37.8044,-122.2712");
    }

    #[test]
    fn error_display() {
        let err = Coordinate::new(100.0, 0.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid coordinate: latitude must be within [-90, 90]"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn in_range_always_accepted(lat in -90.0f64..=90.0, lng in -180.0f64..=180.0) {
            let c = Coordinate::new(lat, lng).unwrap();
            prop_assert_eq!(c.latitude(), lat);
            prop_assert_eq!(c.longitude(), lng);
        }

        #[test]
        fn latitude_out_of_range_rejected(lat in 90.000001f64..1000.0, lng in -180.0f64..=180.0) {
            prop_assert!(Coordinate::new(lat, lng).is_err());
            prop_assert!(Coordinate::new(-lat, lng).is_err());
        }
    }
}
