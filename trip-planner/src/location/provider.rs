//! Device location acquisition.
//!
//! The platform positioning service is abstracted as a [`PositionSource`].
//! [`DeviceLocationProvider`] layers the caller's accuracy, timeout and
//! staleness preferences on top of it.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::geo::Coordinate;

use super::error::LocationError;

/// Default time to wait for a fresh fix.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default maximum age of a cached fix.
const DEFAULT_MAX_AGE: Duration = Duration::from_secs(10);

/// Options for a one-shot location request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationOptions {
    /// Prefer satellite positioning over network positioning.
    pub high_accuracy: bool,
    /// How long to wait for a fresh fix.
    pub timeout: Duration,
    /// Oldest cached fix that is still acceptable.
    pub max_age: Duration,
}

impl LocationOptions {
    pub fn with_high_accuracy(mut self, enabled: bool) -> Self {
        self.high_accuracy = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// Whether a fix taken at `fix.taken_at` is still usable at `now`.
    ///
    /// Fixes stamped in the future (clock skew) count as fresh.
    pub fn is_fresh(&self, fix: &Fix, now: DateTime<Utc>) -> bool {
        match (now - fix.taken_at).to_std() {
            Ok(age) => age <= self.max_age,
            Err(_) => true,
        }
    }
}

impl Default for LocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: DEFAULT_TIMEOUT,
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

/// A position reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    pub coordinate: Coordinate,
    pub taken_at: DateTime<Utc>,
}

impl Fix {
    pub fn new(coordinate: Coordinate, taken_at: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            taken_at,
        }
    }
}

/// Platform positioning service.
pub trait PositionSource: Send + Sync {
    /// Whether the location capability is currently granted.
    fn permission_granted(&self) -> impl Future<Output = bool> + Send;

    /// Prompt the user for the location capability. Returns the outcome.
    fn request_permission(&self) -> impl Future<Output = bool> + Send;

    /// Most recent fix the platform already has, if any.
    fn last_known_fix(&self) -> Option<Fix>;

    /// Ask the platform for a new fix.
    fn request_fix(&self, high_accuracy: bool)
    -> impl Future<Output = Result<Fix, LocationError>> + Send;
}

/// Supplies the device's current coordinate.
///
/// This abstraction allows the trip coordinator to be tested without a
/// real positioning service.
pub trait LocationProvider: Send + Sync {
    /// Whether the location capability is granted.
    fn check_permission(&self) -> impl Future<Output = bool> + Send;

    /// Request the location capability once. Returns whether it was granted.
    fn request_permission(&self) -> impl Future<Output = bool> + Send;

    /// Get a single current position.
    ///
    /// Fails with `PermissionDenied` when the capability has not been
    /// granted; callers are expected to check/request it first.
    fn acquire_current_location(
        &self,
    ) -> impl Future<Output = Result<Coordinate, LocationError>> + Send;
}

/// Location provider backed by a platform [`PositionSource`].
#[derive(Debug, Clone)]
pub struct DeviceLocationProvider<S> {
    source: S,
    options: LocationOptions,
}

impl<S: PositionSource> DeviceLocationProvider<S> {
    pub fn new(source: S, options: LocationOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &LocationOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: PositionSource> LocationProvider for DeviceLocationProvider<S> {
    async fn check_permission(&self) -> bool {
        self.source.permission_granted().await
    }

    async fn request_permission(&self) -> bool {
        self.source.request_permission().await
    }

    async fn acquire_current_location(&self) -> Result<Coordinate, LocationError> {
        if !self.source.permission_granted().await {
            return Err(LocationError::PermissionDenied);
        }

        if let Some(fix) = self.source.last_known_fix()
            && self.options.is_fresh(&fix, Utc::now())
        {
            debug!(taken_at = %fix.taken_at, "using cached location fix");
            return Ok(fix.coordinate);
        }

        trace!(
            high_accuracy = self.options.high_accuracy,
            "requesting fresh location fix"
        );

        let request = self.source.request_fix(self.options.high_accuracy);
        match tokio::time::timeout(self.options.timeout, request).await {
            Ok(fix) => fix.map(|f| f.coordinate),
            Err(_) => Err(LocationError::TimedOut {
                after: self.options.timeout,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{FixedPositionSource, FreshFix};

    fn sf() -> Coordinate {
        Coordinate::new(37.7749, -122.4194).unwrap()
    }

    fn oakland() -> Coordinate {
        Coordinate::new(37.8044, -122.2712).unwrap()
    }

    #[test]
    fn default_options() {
        let options = LocationOptions::default();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(15));
        assert_eq!(options.max_age, Duration::from_secs(10));
    }

    #[test]
    fn freshness_window() {
        let options = LocationOptions::default();
        let now = Utc::now();

        let recent = Fix::new(sf(), now - chrono::Duration::seconds(5));
        let stale = Fix::new(sf(), now - chrono::Duration::seconds(11));
        let future = Fix::new(sf(), now + chrono::Duration::seconds(3));

        assert!(options.is_fresh(&recent, now));
        assert!(!options.is_fresh(&stale, now));
        assert!(options.is_fresh(&future, now));
    }

    #[tokio::test]
    async fn denied_without_permission() {
        let source = FixedPositionSource::denied(FreshFix::At(sf()));
        let provider = DeviceLocationProvider::new(source, LocationOptions::default());

        let result = provider.acquire_current_location().await;
        assert_eq!(result, Err(LocationError::PermissionDenied));
        assert_eq!(provider.source().fix_requests(), 0);
    }

    #[tokio::test]
    async fn fresh_cached_fix_is_reused() {
        let source = FixedPositionSource::granted(FreshFix::At(oakland()))
            .with_last_known(Fix::new(sf(), Utc::now() - chrono::Duration::seconds(2)));
        let provider = DeviceLocationProvider::new(source, LocationOptions::default());

        let coordinate = provider.acquire_current_location().await.unwrap();
        assert_eq!(coordinate, sf());
        assert_eq!(provider.source().fix_requests(), 0);
    }

    #[tokio::test]
    async fn stale_cached_fix_triggers_fresh_request() {
        let source = FixedPositionSource::granted(FreshFix::At(oakland()))
            .with_last_known(Fix::new(sf(), Utc::now() - chrono::Duration::seconds(60)));
        let provider = DeviceLocationProvider::new(source, LocationOptions::default());

        let coordinate = provider.acquire_current_location().await.unwrap();
        assert_eq!(coordinate, oakland());
        assert_eq!(provider.source().fix_requests(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_fix_times_out() {
        let source = FixedPositionSource::granted(FreshFix::Never);
        let options = LocationOptions::default().with_timeout(Duration::from_secs(15));
        let provider = DeviceLocationProvider::new(source, options);

        let result = provider.acquire_current_location().await;
        assert_eq!(
            result,
            Err(LocationError::TimedOut {
                after: Duration::from_secs(15)
            })
        );
    }

    #[tokio::test]
    async fn source_failure_passes_through() {
        let source = FixedPositionSource::granted(FreshFix::Fail("no satellites".into()));
        let provider = DeviceLocationProvider::new(source, LocationOptions::default());

        let result = provider.acquire_current_location().await;
        assert_eq!(
            result,
            Err(LocationError::Unavailable {
                reason: "no satellites".into()
            })
        );
    }
}
