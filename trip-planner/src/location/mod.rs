//! Device location.
//!
//! Wraps the platform positioning service behind a permission-aware,
//! one-shot [`LocationProvider`]. The provider never retries on its own;
//! permission prompts and retries are the caller's decision.

mod error;
mod mock;
mod provider;

pub use error::LocationError;
pub use mock::{FixedPositionSource, FreshFix};
pub use provider::{DeviceLocationProvider, Fix, LocationOptions, LocationProvider, PositionSource};
