use thiserror::Error;

/// Why the IP lookup did not produce a location.
///
/// The `Display` text is what the IP panel shows to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocateError {
    #[error("Rate limit exceeded for IP location service. Please try again later.")]
    RateLimited,

    #[error("IP location service responded with HTTP {0}")]
    Status(u16),

    #[error("Failed to reach IP location service: {0}")]
    Transport(String),

    #[error("IP location service sent an unreadable response: {0}")]
    Malformed(String),

    #[error("IP location service reported an error: {0}")]
    Provider(String),

    #[error("IP location service did not return coordinates")]
    MissingCoordinates,
}

/// Why a GPS request failed.
///
/// Host-provided messages are kept verbatim; they are already user-facing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GpsError {
    #[error("Geolocation not supported by your browser.")]
    Unsupported,

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    PositionUnavailable(String),

    #[error("{0}")]
    Timeout(String),
}
