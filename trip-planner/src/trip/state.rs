//! Trip state values.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::directions::RouteResult;
use crate::fare::FareEstimate;
use crate::geo::{Destination, PlaceLabel, Region};

use super::fault::TripFault;

/// Where the trip pipeline currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum TripPhase {
    /// Not mounted yet.
    #[default]
    Initializing,
    /// Checking permission, fixing the position or labelling it.
    LocatingUser,
    /// Origin known, no destination.
    Ready,
    /// Destination chosen, waiting for its route.
    RoutePending,
    /// Route, duration and fare known.
    EnRoute,
}

/// Which presentation the screen should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PresentationMode {
    /// Place search box.
    Search,
    /// Destination marker, back button and fare card.
    EnRoute,
}

/// Identifies one route request.
///
/// Each destination selection issues a new ticket; a route result is only
/// applied while its ticket is still the pending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteTicket(u64);

impl fmt::Display for RouteTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "route#{}", self.0)
    }
}

/// Working state of the trip screen.
///
/// Immutable: every transition produces a new value. The destination and
/// everything derived from it (duration, fare, route) are set and cleared
/// together, so a fare can never outlive its destination.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripState {
    phase: TripPhase,
    origin_region: Option<Region>,
    origin_label: Option<PlaceLabel>,
    destination: Option<Destination>,
    route_duration_minutes: Option<u64>,
    fare: Option<FareEstimate>,
    route: Option<Arc<RouteResult>>,
    fault: Option<TripFault>,
    #[serde(skip)]
    pending_route: Option<RouteTicket>,
    #[serde(skip)]
    tickets_issued: u64,
}

impl TripState {
    pub fn phase(&self) -> TripPhase {
        self.phase
    }

    pub fn origin_region(&self) -> Option<&Region> {
        self.origin_region.as_ref()
    }

    pub fn origin_label(&self) -> Option<&PlaceLabel> {
        self.origin_label.as_ref()
    }

    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    pub fn route_duration_minutes(&self) -> Option<u64> {
        self.route_duration_minutes
    }

    pub fn fare(&self) -> Option<FareEstimate> {
        self.fare
    }

    pub fn route(&self) -> Option<&RouteResult> {
        self.route.as_deref()
    }

    pub fn fault(&self) -> Option<&TripFault> {
        self.fault.as_ref()
    }

    /// Ticket of the route request the state is waiting on, if any.
    pub fn pending_route(&self) -> Option<RouteTicket> {
        self.pending_route
    }

    pub fn mode(&self) -> PresentationMode {
        if self.destination.is_some() {
            PresentationMode::EnRoute
        } else {
            PresentationMode::Search
        }
    }

    pub(super) fn with_phase(&self, phase: TripPhase) -> Self {
        Self {
            phase,
            ..self.clone()
        }
    }

    pub(super) fn with_fault(&self, fault: Option<TripFault>) -> Self {
        Self {
            fault,
            ..self.clone()
        }
    }

    /// Set the origin. Callers guarantee it is not already set.
    pub(super) fn with_origin(&self, region: Region, label: PlaceLabel) -> Self {
        Self {
            phase: TripPhase::Ready,
            origin_region: Some(region),
            origin_label: Some(label),
            fault: None,
            ..self.clone()
        }
    }

    /// Drop the destination and everything derived from it.
    pub(super) fn without_destination(&self) -> Self {
        Self {
            destination: None,
            route_duration_minutes: None,
            fare: None,
            route: None,
            pending_route: None,
            ..self.clone()
        }
    }

    /// Replace the destination wholesale and wait on a fresh ticket.
    pub(super) fn with_new_destination(&self, destination: Destination) -> (Self, RouteTicket) {
        let ticket = RouteTicket(self.tickets_issued + 1);
        let cleared = self.without_destination();
        let state = Self {
            phase: TripPhase::RoutePending,
            destination: Some(destination),
            fault: None,
            pending_route: Some(ticket),
            tickets_issued: ticket.0,
            ..cleared
        };
        (state, ticket)
    }

    pub(super) fn with_route(&self, route: RouteResult, minutes: u64, fare: FareEstimate) -> Self {
        Self {
            phase: TripPhase::EnRoute,
            route_duration_minutes: Some(minutes),
            fare: Some(fare),
            route: Some(Arc::new(route)),
            pending_route: None,
            ..self.clone()
        }
    }
}
