//! In-memory position source for tests and headless runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;

use crate::geo::Coordinate;

use super::error::LocationError;
use super::provider::{Fix, PositionSource};

/// How a [`FixedPositionSource`] answers requests for a fresh fix.
#[derive(Debug, Clone)]
pub enum FreshFix {
    /// Report this coordinate, stamped with the current time.
    At(Coordinate),
    /// Fail with `LocationError::Unavailable`.
    Fail(String),
    /// Never answer.
    Never,
}

/// Position source with a scripted permission state and fix.
///
/// Counts permission prompts and fix requests so tests can assert on them.
/// Clones share the same permission state and counters.
#[derive(Debug, Clone)]
pub struct FixedPositionSource {
    granted: Arc<AtomicBool>,
    grant_on_request: bool,
    last_known: Option<Fix>,
    fresh: FreshFix,
    delay: Duration,
    permission_requests: Arc<AtomicUsize>,
    fix_requests: Arc<AtomicUsize>,
}

impl FixedPositionSource {
    /// A source whose permission is already granted.
    pub fn granted(fresh: FreshFix) -> Self {
        Self::build(true, fresh)
    }

    /// A source whose permission is not granted, and stays denied when
    /// requested unless [`with_grant_on_request`](Self::with_grant_on_request)
    /// is set.
    pub fn denied(fresh: FreshFix) -> Self {
        Self::build(false, fresh)
    }

    fn build(granted: bool, fresh: FreshFix) -> Self {
        Self {
            granted: Arc::new(AtomicBool::new(granted)),
            grant_on_request: false,
            last_known: None,
            fresh,
            delay: Duration::ZERO,
            permission_requests: Arc::new(AtomicUsize::new(0)),
            fix_requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make a permission request succeed.
    pub fn with_grant_on_request(mut self, grant: bool) -> Self {
        self.grant_on_request = grant;
        self
    }

    /// Seed the platform's cached fix.
    pub fn with_last_known(mut self, fix: Fix) -> Self {
        self.last_known = Some(fix);
        self
    }

    /// Delay each fresh fix by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of permission prompts shown so far.
    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    /// Number of fresh fixes requested so far.
    pub fn fix_requests(&self) -> usize {
        self.fix_requests.load(Ordering::SeqCst)
    }
}

impl PositionSource for FixedPositionSource {
    async fn permission_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    async fn request_permission(&self) -> bool {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        if self.grant_on_request {
            self.granted.store(true, Ordering::SeqCst);
        }
        self.granted.load(Ordering::SeqCst)
    }

    fn last_known_fix(&self) -> Option<Fix> {
        self.last_known
    }

    async fn request_fix(&self, _high_accuracy: bool) -> Result<Fix, LocationError> {
        self.fix_requests.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match &self.fresh {
            FreshFix::At(coordinate) => Ok(Fix::new(*coordinate, Utc::now())),
            FreshFix::Fail(reason) => Err(LocationError::Unavailable {
                reason: reason.clone(),
            }),
            FreshFix::Never => std::future::pending().await,
        }
    }
}
