//! Trip state machine.
//!
//! `TripMachine::step` is a pure function from (state, input) to
//! (next state, effects). It never talks to a gateway; the coordinator runs
//! the effects and feeds their outcomes back in as inputs.
//!
//! ```text
//! Initializing -> LocatingUser -> Ready <-> RoutePending -> EnRoute
//!                                   ^                          |
//!                                   +-------- back ------------+
//! ```

use tracing::{debug, info, trace, warn};

use crate::camera::CameraFit;
use crate::config::TripConfig;
use crate::directions::{DirectionsError, RouteResult};
use crate::fare::{estimate_fare, whole_minutes};
use crate::geo::{Coordinate, Destination, PlaceLabel, Region};
use crate::geocoding::GeocodingError;
use crate::location::LocationError;

use super::fault::{Recovery, TripFault};
use super::state::{RouteTicket, TripPhase, TripState};

/// Something that happened: a UI event or a gateway completion.
#[derive(Debug)]
pub enum Input {
    /// The screen was mounted.
    Mount,
    /// Outcome of the permission check.
    PermissionChecked { granted: bool },
    /// Outcome of the permission prompt.
    PermissionRequested { granted: bool },
    /// Outcome of the one-shot location request.
    LocationAcquired(Result<Coordinate, LocationError>),
    /// Outcome of labelling the acquired location.
    OriginGeocoded {
        coordinate: Coordinate,
        result: Result<PlaceLabel, GeocodingError>,
    },
    /// The user picked a destination.
    DestinationSelected(Destination),
    /// A route request finished.
    RouteResolved {
        ticket: RouteTicket,
        result: Result<RouteResult, DirectionsError>,
    },
    /// The user left the en-route view.
    BackPressed,
    /// The user asked to retry locating.
    RetryLocation,
    /// The user acknowledged the current fault.
    DismissFault,
}

/// Work the coordinator must carry out after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    CheckPermission,
    RequestPermission,
    AcquireLocation,
    ReverseGeocode(Coordinate),
    RequestRoute {
        ticket: RouteTicket,
        origin: Region,
        destination: Destination,
    },
    CancelRoute(RouteTicket),
    FitCamera(CameraFit),
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: TripState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: TripState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    fn unchanged(state: &TripState) -> Self {
        Self {
            state: state.clone(),
            effects: Vec::new(),
        }
    }
}

/// The trip pipeline's transition function.
#[derive(Debug, Clone, Default)]
pub struct TripMachine {
    config: TripConfig,
}

impl TripMachine {
    pub fn new(config: TripConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TripConfig {
        &self.config
    }

    /// Compute the next state and the effects to run.
    pub fn step(&self, state: &TripState, input: Input) -> Transition {
        match input {
            Input::Mount => self.on_mount(state),
            Input::PermissionChecked { granted } => self.on_permission_checked(state, granted),
            Input::PermissionRequested { granted } => {
                // The prompt outcome never resumes the pipeline; the user
                // re-triggers it through the retry affordance.
                info!(granted, "location permission prompt answered");
                Transition::unchanged(state)
            }
            Input::LocationAcquired(result) => self.on_location(state, result),
            Input::OriginGeocoded { coordinate, result } => {
                self.on_origin_geocoded(state, coordinate, result)
            }
            Input::DestinationSelected(destination) => {
                self.on_destination_selected(state, destination)
            }
            Input::RouteResolved { ticket, result } => self.on_route(state, ticket, result),
            Input::BackPressed => self.on_back(state),
            Input::RetryLocation => self.on_retry(state),
            Input::DismissFault => self.on_dismiss(state),
        }
    }

    fn locating(state: &TripState) -> bool {
        state.phase() == TripPhase::LocatingUser && state.origin_region().is_none()
    }

    fn on_mount(&self, state: &TripState) -> Transition {
        if state.phase() != TripPhase::Initializing {
            trace!(phase = ?state.phase(), "ignoring repeated mount");
            return Transition::unchanged(state);
        }

        Transition::to(
            state.with_phase(TripPhase::LocatingUser),
            vec![Effect::CheckPermission],
        )
    }

    fn on_permission_checked(&self, state: &TripState, granted: bool) -> Transition {
        if !Self::locating(state) {
            return Transition::unchanged(state);
        }

        if granted {
            return Transition::to(state.clone(), vec![Effect::AcquireLocation]);
        }

        warn!("location permission not granted, requesting it once");
        Transition::to(
            state.with_fault(Some(TripFault::permission_denied())),
            vec![Effect::RequestPermission],
        )
    }

    fn on_location(
        &self,
        state: &TripState,
        result: Result<Coordinate, LocationError>,
    ) -> Transition {
        if !Self::locating(state) {
            debug!("discarding location fix: origin already settled");
            return Transition::unchanged(state);
        }

        match result {
            Ok(coordinate) => {
                debug!(%coordinate, "location acquired");
                Transition::to(
                    state.with_fault(None),
                    vec![Effect::ReverseGeocode(coordinate)],
                )
            }
            Err(err) => {
                warn!(error = %err, "failed to acquire location");
                Transition::to(
                    state.with_fault(Some(TripFault::from_location(&err))),
                    Vec::new(),
                )
            }
        }
    }

    fn on_origin_geocoded(
        &self,
        state: &TripState,
        coordinate: Coordinate,
        result: Result<PlaceLabel, GeocodingError>,
    ) -> Transition {
        if !Self::locating(state) {
            debug!("discarding origin label: origin already settled");
            return Transition::unchanged(state);
        }

        match result {
            Ok(label) => {
                let region =
                    Region::around(coordinate, self.config.latitude_delta, &self.config.viewport);
                info!(%coordinate, label = %label, "origin ready");
                Transition::to(state.with_origin(region, label), Vec::new())
            }
            Err(err) => {
                warn!(error = %err, %coordinate, "failed to reverse geocode origin");
                Transition::to(
                    state.with_fault(Some(TripFault::from_geocoding(&err))),
                    Vec::new(),
                )
            }
        }
    }

    fn on_destination_selected(&self, state: &TripState, destination: Destination) -> Transition {
        let Some(origin) = state.origin_region().copied() else {
            warn!(
                title = destination.title(),
                "destination selected before origin is known, ignoring"
            );
            return Transition::unchanged(state);
        };

        let mut effects = Vec::with_capacity(2);
        if let Some(stale) = state.pending_route() {
            debug!(%stale, "superseding in-flight route request");
            effects.push(Effect::CancelRoute(stale));
        }

        let (next, ticket) = state.with_new_destination(destination.clone());
        info!(%ticket, title = destination.title(), "requesting route");
        effects.push(Effect::RequestRoute {
            ticket,
            origin,
            destination,
        });

        Transition::to(next, effects)
    }

    fn on_route(
        &self,
        state: &TripState,
        ticket: RouteTicket,
        result: Result<RouteResult, DirectionsError>,
    ) -> Transition {
        if state.pending_route() != Some(ticket) {
            debug!(%ticket, "discarding superseded route result");
            return Transition::unchanged(state);
        }

        match result {
            Ok(route) => {
                let minutes = whole_minutes(route.duration_seconds);
                let fare = estimate_fare(route.duration_seconds, self.config.fare_rate);
                let fit =
                    CameraFit::for_path(&route.path, &self.config.padding, &self.config.viewport);
                info!(%ticket, minutes, fare = %fare, "route ready");
                Transition::to(
                    state.with_route(route, minutes, fare),
                    vec![Effect::FitCamera(fit)],
                )
            }
            Err(err) => {
                warn!(%ticket, error = %err, "route unavailable");
                let next = state
                    .without_destination()
                    .with_phase(TripPhase::Ready)
                    .with_fault(Some(TripFault::from_directions(&err)));
                Transition::to(next, Vec::new())
            }
        }
    }

    fn on_back(&self, state: &TripState) -> Transition {
        if !matches!(state.phase(), TripPhase::RoutePending | TripPhase::EnRoute) {
            return Transition::unchanged(state);
        }

        let effects = state
            .pending_route()
            .map(Effect::CancelRoute)
            .into_iter()
            .collect();

        let next = state
            .without_destination()
            .with_phase(TripPhase::Ready)
            .with_fault(None);
        Transition::to(next, effects)
    }

    fn on_dismiss(&self, state: &TripState) -> Transition {
        // Retry faults stay up until retried, or the pipeline has no way back.
        match state.fault() {
            Some(fault) if fault.recovery() == Recovery::Dismiss => {
                Transition::to(state.with_fault(None), Vec::new())
            }
            Some(fault) => {
                debug!(kind = ?fault.kind, "ignoring dismiss of a retryable fault");
                Transition::unchanged(state)
            }
            None => Transition::unchanged(state),
        }
    }

    fn on_retry(&self, state: &TripState) -> Transition {
        // Only after a failure, so at most one location attempt is in flight.
        if !Self::locating(state) || state.fault().is_none() {
            return Transition::unchanged(state);
        }

        info!("retrying location");
        Transition::to(state.with_fault(None), vec![Effect::CheckPermission])
    }
}
