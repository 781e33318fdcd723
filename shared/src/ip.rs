use crate::error::LocateError;
use crate::location::{IpLocation, IpLookup, IpLookupBody};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, warn};

/// Provider queried when no other endpoint is configured.
pub const DEFAULT_PROVIDER_URL: &str = "https://ipapi.co/json/";

/// Public CORS relay; the target URL is appended verbatim.
pub const DEFAULT_CORS_RELAY: &str = "https://corsproxy.io/?";

/// Same-origin route served by the tracker backend.
pub const PROXY_PATH: &str = "/api/ip-location";

/// Where the IP lookup request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpEndpoint {
    /// Straight to the provider. Needs the provider to allow CORS.
    Direct(String),
    /// Through a relay that adds CORS headers.
    CorsRelay { relay: String, target: String },
    /// Through the tracker backend on the page's own origin.
    SameOrigin(String),
}

impl Default for IpEndpoint {
    fn default() -> Self {
        Self::SameOrigin(PROXY_PATH.to_string())
    }
}

impl IpEndpoint {
    /// Picks an endpoint by name: `direct`, `relay` or `proxy`.
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind.trim().to_ascii_lowercase().as_str() {
            "direct" => Some(Self::Direct(DEFAULT_PROVIDER_URL.to_string())),
            "relay" | "cors" => Some(Self::CorsRelay {
                relay: DEFAULT_CORS_RELAY.to_string(),
                target: DEFAULT_PROVIDER_URL.to_string(),
            }),
            "proxy" | "same-origin" => Some(Self::default()),
            _ => None,
        }
    }

    pub fn url(&self) -> String {
        match self {
            Self::Direct(url) | Self::SameOrigin(url) => url.clone(),
            Self::CorsRelay { relay, target } => format!("{relay}{target}"),
        }
    }
}

/// Any transport able to perform the lookup.
#[allow(async_fn_in_trait)]
pub trait IpLocationSource {
    async fn fetch_ip_location(&self) -> Result<IpLocation, LocateError>;
}

/// Interprets a finished HTTP exchange, whatever client performed it.
pub fn parse_ip_response(status: u16, body: &[u8]) -> Result<IpLocation, LocateError> {
    if status == 429 {
        return Err(LocateError::RateLimited);
    }
    if !(200..300).contains(&status) {
        return Err(LocateError::Status(status));
    }

    let body: IpLookupBody =
        serde_json::from_slice(body).map_err(|e| LocateError::Malformed(e.to_string()))?;
    IpLocation::try_from(body)
}

/// Runs the IP lookup at most once per session.
pub struct IpLocator<S> {
    source: S,
    started: AtomicBool,
}

impl<S: IpLocationSource> IpLocator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            started: AtomicBool::new(false),
        }
    }

    /// Performs the lookup on the first call and returns `None` afterwards.
    ///
    /// Failures never escape: they become [`IpLookup::Fallback`], which is
    /// terminal for the session.
    pub async fn locate_once(&self) -> Option<IpLookup> {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("IP lookup already issued for this session");
            return None;
        }

        let lookup = match self.source.fetch_ip_location().await {
            Ok(location) => {
                debug!(ip = %location.ip, lat = location.latitude, lng = location.longitude, "IP location resolved");
                IpLookup::Located(location)
            }
            Err(error) => {
                warn!(%error, "IP location lookup failed, falling back to default center");
                IpLookup::fallback(&error)
            }
        };
        Some(lookup)
    }
}
