//! Directions gateway.
//!
//! Requests a route between the user's origin and the chosen destination
//! and decodes it into a coordinate path plus a travel duration. Route
//! requests take a cancellation token so a superseded request can be
//! dropped at the transport level.

mod client;
mod error;
mod polyline;
mod route;
mod types;

pub use client::{DirectionsClient, DirectionsConfig, RouteProvider};
pub use error::DirectionsError;
pub use polyline::{PolylineError, decode as decode_polyline};
pub use route::{RouteResult, TravelMode};
pub use types::{ApiLeg, ApiRoute, ApiStep, DirectionsResponse, EncodedPolyline, TextValue};
