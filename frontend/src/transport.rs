// Host-side implementations of the locator seams.

use dioxus::prelude::*;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracker_shared::error::LocateError;
use tracker_shared::gps::{GeolocationHost, HostCoordinates, HostPositionError, PositionErrorCode, PositionOptions};
use tracker_shared::ip::{parse_ip_response, IpLocationSource};
use tracker_shared::IpLocation;

/// IP lookup over plain HTTP GET.
pub struct HttpIpSource {
    url: String,
}

impl HttpIpSource {
    pub fn new(url: String) -> Self {
        Self { url }
    }
}

impl IpLocationSource for HttpIpSource {
    #[cfg(target_arch = "wasm32")]
    async fn fetch_ip_location(&self) -> Result<IpLocation, LocateError> {
        let resp = gloo_net::http::Request::get(&self.url)
            .send()
            .await
            .map_err(|e| LocateError::Transport(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .binary()
            .await
            .map_err(|e| LocateError::Transport(e.to_string()))?;
        parse_ip_response(status, &body)
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn fetch_ip_location(&self) -> Result<IpLocation, LocateError> {
        let resp = reqwest::get(&self.url)
            .await
            .map_err(|e| LocateError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| LocateError::Transport(e.to_string()))?;
        parse_ip_response(status, &body)
    }
}

const DETECT_SCRIPT: &str = r#"
    dioxus.send(!!(typeof navigator !== "undefined" && navigator.geolocation));
"#;

const CURRENT_POSITION_SCRIPT: &str = r#"
    try {
      navigator.geolocation.getCurrentPosition(
        (pos) => {
          const c = pos.coords;
          dioxus.send({
            status: "fix",
            latitude: c.latitude,
            longitude: c.longitude,
            accuracy: c.accuracy,
            altitude: (typeof c.altitude === "number") ? c.altitude : null,
          });
        },
        (err) => dioxus.send({ status: "failed", code: err.code, message: err.message || "" }),
        __OPTIONS__
      );
    } catch (e) {
      dioxus.send({ status: "failed", code: 2, message: String(e) });
    }
"#;

#[derive(Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum GeoReply {
    Fix {
        latitude: f64,
        longitude: f64,
        accuracy: f64,
        altitude: Option<f64>,
    },
    Failed {
        code: u16,
        message: String,
    },
}

/// `navigator.geolocation` of the page or desktop webview, reached through
/// the eval bridge.
pub struct WebviewGeolocation {
    available: bool,
}

impl WebviewGeolocation {
    /// Checks for the capability without asking for a position.
    pub async fn detect() -> Self {
        let mut eval = document::eval(DETECT_SCRIPT);
        let available = eval.recv::<bool>().await.unwrap_or(false);
        Self { available }
    }
}

fn options_js(options: PositionOptions) -> String {
    let mut js = Map::new();
    js.insert("enableHighAccuracy".into(), Value::Bool(options.enable_high_accuracy));
    js.insert("maximumAge".into(), Value::from(options.maximum_age_ms));
    // A null timeout would mean zero to the browser; leave it out instead.
    if let Some(timeout) = options.timeout_ms {
        js.insert("timeout".into(), Value::from(timeout));
    }
    Value::Object(js).to_string()
}

impl GeolocationHost for WebviewGeolocation {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<HostCoordinates, HostPositionError> {
        let script = CURRENT_POSITION_SCRIPT.replace("__OPTIONS__", &options_js(options));
        let mut eval = document::eval(&script);

        match eval.recv::<GeoReply>().await {
            Ok(GeoReply::Fix {
                latitude,
                longitude,
                accuracy,
                altitude,
            }) => Ok(HostCoordinates {
                latitude,
                longitude,
                accuracy,
                altitude,
            }),
            Ok(GeoReply::Failed { code, message }) => Err(HostPositionError {
                code: PositionErrorCode::from_code(code),
                message,
            }),
            Err(e) => {
                tracing::warn!("geolocation bridge failed: {e:?}");
                Err(HostPositionError {
                    code: PositionErrorCode::PositionUnavailable,
                    message: String::new(),
                })
            }
        }
    }
}
