use crate::error::GpsError;
use crate::location::{GpsFix, GpsResult};
use tracing::{debug, warn};

/// Options passed to the host's "current position" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    /// `None` leaves the host default (no limit in browsers).
    pub timeout_ms: Option<u32>,
    pub maximum_age_ms: u32,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout_ms: None,
            maximum_age_ms: 0,
        }
    }
}

/// Coordinates as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostCoordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    pub altitude: Option<f64>,
}

/// W3C `GeolocationPositionError` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum PositionErrorCode {
    PermissionDenied = 1,
    PositionUnavailable = 2,
    Timeout = 3,
}

impl PositionErrorCode {
    pub fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            3 => Self::Timeout,
            _ => Self::PositionUnavailable,
        }
    }

    fn default_message(self) -> &'static str {
        match self {
            Self::PermissionDenied => "User denied Geolocation",
            Self::PositionUnavailable => "Position unavailable",
            Self::Timeout => "Timeout expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPositionError {
    pub code: PositionErrorCode,
    pub message: String,
}

impl From<HostPositionError> for GpsError {
    fn from(err: HostPositionError) -> Self {
        let message = if err.message.trim().is_empty() {
            err.code.default_message().to_string()
        } else {
            err.message
        };
        match err.code {
            PositionErrorCode::PermissionDenied => Self::PermissionDenied(message),
            PositionErrorCode::PositionUnavailable => Self::PositionUnavailable(message),
            PositionErrorCode::Timeout => Self::Timeout(message),
        }
    }
}

/// The browser/OS location capability.
#[allow(async_fn_in_trait)]
pub trait GeolocationHost {
    /// False when the host has no geolocation API at all.
    fn is_available(&self) -> bool;

    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<HostCoordinates, HostPositionError>;
}

/// User-triggered precise location request.
///
/// Every call asks the host again; overlapping calls are left to the host to
/// serialize.
pub struct GpsLocator<H> {
    host: H,
    options: PositionOptions,
}

impl<H: GeolocationHost> GpsLocator<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            options: PositionOptions::default(),
        }
    }

    pub async fn locate(&self) -> GpsResult {
        if !self.host.is_available() {
            warn!("geolocation capability missing, no request issued");
            return Err(GpsError::Unsupported);
        }

        match self.host.current_position(self.options).await {
            Ok(coords) => {
                debug!(
                    lat = coords.latitude,
                    lng = coords.longitude,
                    accuracy = coords.accuracy,
                    "GPS fix acquired"
                );
                Ok(GpsFix::new(
                    coords.latitude,
                    coords.longitude,
                    coords.accuracy,
                    coords.altitude.filter(|a| a.is_finite()),
                ))
            }
            Err(err) => {
                let err = GpsError::from(err);
                warn!(error = %err, "GPS request failed");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::location::Position;
    use std::cell::RefCell;

    /// Scripted host; records every request it receives.
    pub(crate) struct FakeHost {
        pub available: bool,
        pub reply: Result<HostCoordinates, HostPositionError>,
        pub requests: RefCell<Vec<PositionOptions>>,
    }

    impl FakeHost {
        pub fn replying(reply: Result<HostCoordinates, HostPositionError>) -> Self {
            Self {
                available: true,
                reply,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl GeolocationHost for FakeHost {
        fn is_available(&self) -> bool {
            self.available
        }

        async fn current_position(
            &self,
            options: PositionOptions,
        ) -> Result<HostCoordinates, HostPositionError> {
            self.requests.borrow_mut().push(options);
            self.reply.clone()
        }
    }

    pub(crate) fn san_francisco() -> HostCoordinates {
        HostCoordinates {
            latitude: 37.7749,
            longitude: -122.4194,
            accuracy: 15.0,
            altitude: Some(30.0),
        }
    }

    #[tokio::test]
    async fn missing_capability_never_asks_host() {
        let host = FakeHost {
            available: false,
            ..FakeHost::replying(Ok(san_francisco()))
        };
        let locator = GpsLocator::new(host);

        assert_eq!(locator.locate().await, Err(GpsError::Unsupported));
        assert!(locator.host.requests.borrow().is_empty());
    }

    #[tokio::test]
    async fn requests_high_accuracy() {
        let locator = GpsLocator::new(FakeHost::replying(Ok(san_francisco())));
        locator.locate().await.expect("fix expected");

        let requests = locator.host.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].enable_high_accuracy);
    }

    #[tokio::test]
    async fn success_normalizes_coordinates() {
        let fix = GpsLocator::new(FakeHost::replying(Ok(san_francisco())))
            .locate()
            .await
            .expect("fix expected");

        assert_eq!(fix.position, Position::new(37.7749, -122.4194));
        assert_eq!(fix.accuracy, 15.0);
        assert_eq!(fix.altitude, Some(30.0));
    }

    #[tokio::test]
    async fn host_errors_keep_their_message() {
        let locator = GpsLocator::new(FakeHost::replying(Err(HostPositionError {
            code: PositionErrorCode::from_code(1),
            message: "User denied Geolocation".into(),
        })));
        assert_eq!(
            locator.locate().await,
            Err(GpsError::PermissionDenied("User denied Geolocation".into()))
        );

        let locator = GpsLocator::new(FakeHost::replying(Err(HostPositionError {
            code: PositionErrorCode::Timeout,
            message: String::new(),
        })));
        assert_eq!(
            locator.locate().await,
            Err(GpsError::Timeout("Timeout expired".into()))
        );
    }

    #[tokio::test]
    async fn repeated_requests_are_identical() {
        let locator = GpsLocator::new(FakeHost::replying(Ok(san_francisco())));

        let first = locator.locate().await;
        let second = locator.locate().await;

        assert_eq!(first, second);
        assert_eq!(locator.host.requests.borrow().len(), 2);
    }
}
