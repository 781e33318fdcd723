// Build-time settings. Read with option_env! so a wasm bundle carries them.

use tracker_shared::IpEndpoint;

/// OpenStreetMap standard tiles; no key required.
const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
const DEFAULT_TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

/// Where a desktop build finds the backend (a web build uses its own origin).
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_BACKEND_URL: &str = "http://localhost:3000";

pub fn ip_endpoint() -> IpEndpoint {
    option_env!("TRACKER_IP_ENDPOINT")
        .and_then(IpEndpoint::from_kind)
        .unwrap_or_default()
}

/// Absolute or page-relative URL of the IP lookup.
pub fn ip_lookup_url() -> String {
    #[cfg(not(target_arch = "wasm32"))]
    let backend = Some(option_env!("TRACKER_BACKEND_URL").unwrap_or(DEFAULT_BACKEND_URL));
    #[cfg(target_arch = "wasm32")]
    let backend = None;

    lookup_url(ip_endpoint(), backend)
}

/// Same-origin paths get the backend prefixed when the app has no origin of
/// its own (desktop).
fn lookup_url(endpoint: IpEndpoint, backend: Option<&str>) -> String {
    match (endpoint, backend) {
        (IpEndpoint::SameOrigin(path), Some(base)) => {
            format!("{}{path}", base.trim_end_matches('/'))
        }
        (endpoint, _) => endpoint.url(),
    }
}

/// Tile URL template with the map API key, if any, filled in.
pub fn tile_url() -> String {
    fill_key(
        option_env!("TRACKER_MAP_TILE_URL").unwrap_or(DEFAULT_TILE_URL),
        option_env!("TRACKER_MAP_API_KEY"),
    )
}

fn fill_key(template: &str, key: Option<&str>) -> String {
    match key {
        Some(key) => template.replace("{key}", key),
        None => template.to_string(),
    }
}

pub fn tile_attribution() -> &'static str {
    option_env!("TRACKER_MAP_ATTRIBUTION").unwrap_or(DEFAULT_TILE_ATTRIBUTION)
}
