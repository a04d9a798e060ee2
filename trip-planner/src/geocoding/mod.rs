//! Reverse geocoding gateway.
//!
//! Turns the user's coordinate into a short place label for the origin
//! marker. Only the first result returned by the service is used, and the
//! label is the part of its formatted address before the first comma.

mod client;
mod error;
mod types;

pub use client::{GeocodingClient, GeocodingConfig, ReverseGeocoder};
pub use error::GeocodingError;
pub use types::{GeocodeResponse, GeocodeResult};
