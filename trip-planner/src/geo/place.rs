//! Place labels and destinations.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Coordinate, InvalidCoordinate};

/// Short human-readable name of a place, e.g. a locality.
///
/// Derived from a geocoder's formatted address by keeping only the text
/// before the first comma. Addresses that are not locality-first
/// ("123 Main St, Springfield, ...") yield the street part instead.
///
/// # Examples
///
/// ```
/// use trip_planner::geo::PlaceLabel;
///
/// let label = PlaceLabel::from_formatted_address("Rua Augusta, São Paulo, Brazil");
/// assert_eq!(label.as_str(), "Rua Augusta");
///
/// let label = PlaceLabel::from_formatted_address("Antarctica");
/// assert_eq!(label.as_str(), "Antarctica");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlaceLabel(String);

impl PlaceLabel {
    /// Extract the label from a comma-delimited formatted address.
    pub fn from_formatted_address(address: &str) -> Self {
        let label = match address.find(',') {
            Some(idx) => &address[..idx],
            None => address,
        };
        PlaceLabel(label.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A destination picked by the user.
///
/// The title comes from the place search result, not from reverse
/// geocoding, and never changes once the destination exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Destination {
    #[serde(flatten)]
    coordinate: Coordinate,
    title: String,
}

impl Destination {
    pub fn new(coordinate: Coordinate, title: impl Into<String>) -> Self {
        Self {
            coordinate,
            title: title.into(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

/// Payload of a "destination selected" event from the place search widget.
///
/// Mirrors the shape of a Places autocomplete pick: the structured main text
/// plus the place details geometry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DestinationSelection {
    pub structured_formatting: StructuredFormatting,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StructuredFormatting {
    pub main_text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl DestinationSelection {
    /// Build a selection payload directly (for non-widget callers).
    pub fn new(title: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            structured_formatting: StructuredFormatting {
                main_text: title.into(),
            },
            geometry: Geometry {
                location: LatLng { lat, lng },
            },
        }
    }

    /// Validate the payload into a destination.
    pub fn into_destination(self) -> Result<Destination, InvalidCoordinate> {
        let LatLng { lat, lng } = self.geometry.location;
        let coordinate = Coordinate::new(lat, lng)?;
        Ok(Destination::new(
            coordinate,
            self.structured_formatting.main_text,
        ))
    }
}
