//! Location provider error types.

use std::time::Duration;

/// Errors from acquiring the device location.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// Location capability has not been granted
    #[error("location permission not granted")]
    PermissionDenied,

    /// Positioning service failed to produce a fix
    #[error("location unavailable: {reason}")]
    Unavailable { reason: String },

    /// No fresh fix arrived in time
    #[error("location request timed out after {}s", .after.as_secs())]
    TimedOut { after: Duration },
}
