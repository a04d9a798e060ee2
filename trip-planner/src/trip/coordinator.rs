//! Async driver for the trip state machine.
//!
//! The coordinator owns the gateways and runs every effect the machine asks
//! for. Gateway calls run concurrently on one task and report back as
//! machine inputs, so all state changes happen in one place and in order.
//! Route requests carry a [`CancellationToken`]; superseding or abandoning a
//! destination cancels the old request at the transport as well as
//! discarding its result.

use std::collections::{HashMap, VecDeque};

use futures::FutureExt;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::camera::CameraFit;
use crate::config::TripConfig;
use crate::directions::RouteProvider;
use crate::geo::{Coordinate, Destination, DestinationSelection, Region};
use crate::geocoding::ReverseGeocoder;
use crate::location::LocationProvider;

use super::machine::{Effect, Input, TripMachine};
use super::state::{RouteTicket, TripState};

/// Capacity of the UI event channel.
const EVENT_BUFFER: usize = 32;

/// Something the user did on the trip screen.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A place was picked from search.
    DestinationSelected(DestinationSelection),
    /// The back button in en-route mode.
    BackPressed,
    /// The retry affordance after a location fault.
    RetryLocation,
    /// The dismiss affordance on a fault notice.
    DismissFault,
}

/// The coordinator task is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("trip coordinator has stopped")]
pub struct TripClosed;

/// Runs the trip pipeline against real or mock gateways.
pub struct TripCoordinator<L, G, R> {
    machine: TripMachine,
    location: L,
    geocoder: G,
    router: R,
}

impl<L, G, R> TripCoordinator<L, G, R>
where
    L: LocationProvider + 'static,
    G: ReverseGeocoder + 'static,
    R: RouteProvider + 'static,
{
    pub fn new(config: TripConfig, location: L, geocoder: G, router: R) -> Self {
        Self {
            machine: TripMachine::new(config),
            location,
            geocoder,
            router,
        }
    }

    /// Start the coordinator on the current runtime.
    ///
    /// The task runs until every [`TripHandle`] is dropped and then yields
    /// the final state.
    pub fn spawn(self) -> (TripHandle, JoinHandle<TripState>) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let (state_tx, state_rx) = watch::channel(TripState::default());
        let (camera_tx, camera_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(self.run(
            events_rx,
            Surface {
                state: state_tx,
                camera: camera_tx,
            },
        ));

        let handle = TripHandle {
            events: events_tx,
            state: state_rx,
            camera: camera_rx,
        };
        (handle, task)
    }

    async fn run(self, mut events: mpsc::Receiver<UiEvent>, surface: Surface) -> TripState {
        let Self {
            machine,
            location,
            geocoder,
            router,
        } = self;
        let gateways = Gateways {
            location: &location,
            geocoder: &geocoder,
            router: &router,
        };

        let mut state = TripState::default();
        let mut queue = VecDeque::from([Input::Mount]);
        let mut in_flight: FuturesUnordered<BoxFuture<'_, Input>> = FuturesUnordered::new();
        let mut cancels: HashMap<RouteTicket, CancellationToken> = HashMap::new();

        loop {
            while let Some(input) = queue.pop_front() {
                let transition = machine.step(&state, input);
                state = transition.state;

                for effect in transition.effects {
                    match effect {
                        Effect::CancelRoute(ticket) => {
                            if let Some(token) = cancels.remove(&ticket) {
                                debug!(%ticket, "cancelling route request");
                                token.cancel();
                            }
                        }
                        Effect::FitCamera(fit) => surface.fit_camera(fit),
                        Effect::CheckPermission => {
                            in_flight.push(gateways.run(Call::CheckPermission))
                        }
                        Effect::RequestPermission => {
                            in_flight.push(gateways.run(Call::RequestPermission))
                        }
                        Effect::AcquireLocation => {
                            in_flight.push(gateways.run(Call::AcquireLocation))
                        }
                        Effect::ReverseGeocode(coordinate) => {
                            in_flight.push(gateways.run(Call::ReverseGeocode(coordinate)))
                        }
                        Effect::RequestRoute {
                            ticket,
                            origin,
                            destination,
                        } => {
                            let cancel = CancellationToken::new();
                            cancels.insert(ticket, cancel.clone());
                            in_flight.push(gateways.run(Call::Route {
                                ticket,
                                origin,
                                destination,
                                cancel,
                            }));
                        }
                    }
                }

                if state.pending_route().is_none() {
                    cancels.clear();
                }
                surface.publish(&state);
            }

            tokio::select! {
                Some(input) = in_flight.next(), if !in_flight.is_empty() => {
                    if let Input::RouteResolved { ticket, .. } = &input {
                        cancels.remove(ticket);
                    }
                    queue.push_back(input);
                }
                event = events.recv() => match event {
                    Some(event) => {
                        if let Some(input) = input_for(event) {
                            queue.push_back(input);
                        }
                    }
                    None => {
                        info!("trip screen closed, stopping coordinator");
                        break;
                    }
                },
            }
        }

        for (ticket, token) in cancels {
            trace!(%ticket, "cancelling route request on shutdown");
            token.cancel();
        }
        state
    }
}

/// Translate a UI event into a machine input.
fn input_for(event: UiEvent) -> Option<Input> {
    match event {
        UiEvent::DestinationSelected(selection) => match selection.into_destination() {
            Ok(destination) => Some(Input::DestinationSelected(destination)),
            Err(err) => {
                warn!(error = %err, "ignoring destination with invalid coordinate");
                None
            }
        },
        UiEvent::BackPressed => Some(Input::BackPressed),
        UiEvent::RetryLocation => Some(Input::RetryLocation),
        UiEvent::DismissFault => Some(Input::DismissFault),
    }
}

/// A gateway call started by the run loop.
enum Call {
    CheckPermission,
    RequestPermission,
    AcquireLocation,
    ReverseGeocode(Coordinate),
    Route {
        ticket: RouteTicket,
        origin: Region,
        destination: Destination,
        cancel: CancellationToken,
    },
}

/// Borrowed gateways for the lifetime of one run.
struct Gateways<'a, L, G, R> {
    location: &'a L,
    geocoder: &'a G,
    router: &'a R,
}

impl<L, G, R> Clone for Gateways<'_, L, G, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L, G, R> Copy for Gateways<'_, L, G, R> {}

impl<'a, L, G, R> Gateways<'a, L, G, R>
where
    L: LocationProvider,
    G: ReverseGeocoder,
    R: RouteProvider,
{
    /// Run a gateway call and report its outcome as an input.
    fn run(self, call: Call) -> BoxFuture<'a, Input> {
        let Self {
            location,
            geocoder,
            router,
        } = self;

        async move {
            match call {
                Call::CheckPermission => Input::PermissionChecked {
                    granted: location.check_permission().await,
                },
                Call::RequestPermission => Input::PermissionRequested {
                    granted: location.request_permission().await,
                },
                Call::AcquireLocation => {
                    Input::LocationAcquired(location.acquire_current_location().await)
                }
                Call::ReverseGeocode(coordinate) => Input::OriginGeocoded {
                    coordinate,
                    result: geocoder.reverse_geocode(coordinate).await,
                },
                Call::Route {
                    ticket,
                    origin,
                    destination,
                    cancel,
                } => Input::RouteResolved {
                    ticket,
                    result: router.get_route(&origin, &destination, &cancel).await,
                },
            }
        }
        .boxed()
    }
}

/// Outputs of a run: published state and camera instructions.
struct Surface {
    state: watch::Sender<TripState>,
    camera: mpsc::UnboundedSender<CameraFit>,
}

impl Surface {
    fn publish(&self, state: &TripState) {
        self.state.send_if_modified(|current| {
            if current == state {
                return false;
            }
            *current = state.clone();
            true
        });
    }

    fn fit_camera(&self, fit: CameraFit) {
        trace!(points = fit.coordinates.len(), "fitting camera to route");
        if self.camera.send(fit).is_err() {
            debug!("camera fit dropped: no presentation surface");
        }
    }
}

/// Presentation surface's side of a running coordinator.
pub struct TripHandle {
    events: mpsc::Sender<UiEvent>,
    state: watch::Receiver<TripState>,
    camera: mpsc::UnboundedReceiver<CameraFit>,
}

impl TripHandle {
    /// Deliver a UI event.
    pub async fn send(&self, event: UiEvent) -> Result<(), TripClosed> {
        self.events.send(event).await.map_err(|_| TripClosed)
    }

    /// Latest published state.
    pub fn state(&self) -> TripState {
        self.state.borrow().clone()
    }

    /// Watch for state changes.
    pub fn subscribe(&self) -> watch::Receiver<TripState> {
        self.state.clone()
    }

    /// Wait until the published state satisfies `predicate`.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&TripState) -> bool,
    ) -> Result<TripState, TripClosed> {
        let state = self
            .state
            .wait_for(predicate)
            .await
            .map_err(|_| TripClosed)?;
        Ok(state.clone())
    }

    /// Wait for the next camera instruction.
    pub async fn next_camera_fit(&mut self) -> Option<CameraFit> {
        self.camera.recv().await
    }

    /// Take a camera instruction if one is already waiting.
    pub fn try_next_camera_fit(&mut self) -> Option<CameraFit> {
        self.camera.try_recv().ok()
    }
}
