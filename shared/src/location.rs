use crate::error::{GpsError, LocateError};
use serde::{Deserialize, Serialize};

/// Map center used while the IP lookup is pending, and after it fails.
pub const DEFAULT_CENTER: Position = Position::new(0.0, 0.0);

/// A map coordinate, in the `{lat, lng}` shape map widgets expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl Position {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Raw body of an ipapi-style lookup. Every field may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpLookupBody {
    pub ip: Option<String>,
    pub org: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    // ipapi answers some failures with a 200 and `{"error": true, "reason": ...}`
    pub error: Option<serde_json::Value>,
    pub reason: Option<String>,
}

/// Approximate location resolved from the visitor's public address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpLocation {
    pub ip: String,
    pub org: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub country_name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub position: Position,
}

impl TryFrom<IpLookupBody> for IpLocation {
    type Error = LocateError;

    fn try_from(body: IpLookupBody) -> Result<Self, Self::Error> {
        if let Some(reason) = provider_error(&body) {
            return Err(if reason == "RateLimited" {
                LocateError::RateLimited
            } else {
                LocateError::Provider(reason)
            });
        }

        let (Some(latitude), Some(longitude)) = (body.latitude, body.longitude) else {
            return Err(LocateError::MissingCoordinates);
        };
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(LocateError::MissingCoordinates);
        }

        Ok(Self {
            ip: body.ip.unwrap_or_default(),
            org: body.org,
            city: body.city,
            region: body.region,
            country_name: body.country_name,
            latitude,
            longitude,
            position: Position::new(latitude, longitude),
        })
    }
}

fn provider_error(body: &IpLookupBody) -> Option<String> {
    let reason = || body.reason.clone().unwrap_or_else(|| "unknown error".to_string());
    match body.error.as_ref()? {
        serde_json::Value::Bool(true) => Some(reason()),
        serde_json::Value::String(message) => Some(message.clone()),
        _ => None,
    }
}

/// Outcome of the session's single IP lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum IpLookup {
    Located(IpLocation),
    /// The lookup failed; the map falls back to [`DEFAULT_CENTER`].
    Fallback { error: String, position: Position },
}

impl IpLookup {
    pub fn fallback(error: &LocateError) -> Self {
        Self::Fallback {
            error: error.to_string(),
            position: DEFAULT_CENTER,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Self::Located(location) => location.position,
            Self::Fallback { position, .. } => *position,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Located(_) => None,
            Self::Fallback { error, .. } => Some(error),
        }
    }
}

/// Device-reported location from the host geolocation capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpsFix {
    /// Radius of the 95% confidence circle, in meters.
    pub accuracy: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above the WGS84 ellipsoid, when the device can tell.
    pub altitude: Option<f64>,
    pub position: Position,
}

impl GpsFix {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64, altitude: Option<f64>) -> Self {
        Self {
            accuracy,
            latitude,
            longitude,
            altitude,
            position: Position::new(latitude, longitude),
        }
    }
}

/// Result of one GPS request as the view model stores it.
pub type GpsResult = Result<GpsFix, GpsError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: &str) -> IpLookupBody {
        serde_json::from_str(json).expect("test body should parse")
    }

    #[test]
    fn position_mirrors_latitude_and_longitude() {
        let location = IpLocation::try_from(body(
            r#"{"ip":"203.0.113.7","org":"Example ISP","city":"Buffalo","region":"New York",
                "country_name":"United States","latitude":42.8864,"longitude":-78.8784}"#,
        ))
        .expect("complete body should resolve");

        assert_eq!(location.position, Position::new(42.8864, -78.8784));
        assert_eq!(location.ip, "203.0.113.7");
        assert_eq!(location.city.as_deref(), Some("Buffalo"));
    }

    #[test]
    fn nullable_fields_are_tolerated() {
        let location = IpLocation::try_from(body(
            r#"{"ip":null,"org":null,"latitude":-33.86,"longitude":151.2}"#,
        ))
        .expect("coordinates alone are enough");

        assert_eq!(location.ip, "");
        assert!(location.org.is_none());
        assert!(location.country_name.is_none());
    }

    #[test]
    fn missing_coordinates_fail() {
        let err = IpLocation::try_from(body(r#"{"ip":"198.51.100.1","latitude":10.0}"#))
            .expect_err("longitude is required");
        assert_eq!(err, LocateError::MissingCoordinates);
    }

    #[test]
    fn provider_rate_limit_flag_maps_to_rate_limited() {
        let err = IpLocation::try_from(body(r#"{"error":true,"reason":"RateLimited"}"#))
            .expect_err("error bodies must not resolve");
        assert_eq!(err, LocateError::RateLimited);

        let err = IpLocation::try_from(body(r#"{"error":true,"reason":"Reserved IP Address"}"#))
            .expect_err("error bodies must not resolve");
        assert_eq!(err, LocateError::Provider("Reserved IP Address".into()));
    }

    #[test]
    fn proxy_error_string_is_reported() {
        let err = IpLocation::try_from(body(r#"{"error":"Failed to fetch IP location data"}"#))
            .expect_err("proxy error bodies must not resolve");
        assert_eq!(
            err,
            LocateError::Provider("Failed to fetch IP location data".into())
        );
    }

    #[test]
    fn fallback_centers_on_origin() {
        let lookup = IpLookup::fallback(&LocateError::Status(503));
        assert_eq!(lookup.position(), DEFAULT_CENTER);
        assert!(lookup.error().is_some());
        assert!(matches!(lookup, IpLookup::Fallback { .. }));
    }
}
