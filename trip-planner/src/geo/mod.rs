//! Geographic value types for the trip planner.
//!
//! Everything in here is an immutable value. Types that carry an invariant
//! (valid latitude/longitude ranges, label extraction) enforce it at
//! construction, so the rest of the crate can pass them around freely.

mod coordinate;
mod place;
mod region;

pub use coordinate::{Coordinate, InvalidCoordinate};
pub use place::{
    Destination, DestinationSelection, Geometry, LatLng, PlaceLabel, StructuredFormatting,
};
pub use region::{DEFAULT_LATITUDE_DELTA, Region, Viewport};
