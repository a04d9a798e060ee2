//! Trip coordination.
//!
//! [`TripMachine`] holds the rules for moving between phases;
//! [`TripCoordinator`] drives it against the location, geocoding and
//! directions gateways and publishes state for the presentation surface.

mod coordinator;
mod fault;
mod machine;
mod state;


pub use coordinator::{TripClosed, TripCoordinator, TripHandle, UiEvent};
pub use fault::{FaultKind, Recovery, TripFault};
pub use machine::{Effect, Input, Transition, TripMachine};
pub use state::{PresentationMode, RouteTicket, TripPhase, TripState};
