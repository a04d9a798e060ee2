//! Trip planner core.
//!
//! Locates the user, labels their position, routes them to a chosen
//! destination and estimates the fare, publishing a single trip state for
//! a map screen to render.

pub mod cache;
pub mod camera;
pub mod config;
pub mod directions;
pub mod fare;
pub mod geo;
pub mod geocoding;
pub mod location;
pub mod trip;
