// frontend/src/app.rs

use crate::map::{LeafletMap, MapPanel};
use crate::panels::{GpsCard, IpCard};
use crate::settings;
use crate::transport::{HttpIpSource, WebviewGeolocation};
use dioxus::prelude::*;
use std::rc::Rc;
use tracker_shared::presenter::MarkerColor;
use tracker_shared::{GpsLocator, IpLocator, Lifetime, MarkerId, Tracker};

// --- global css ---
const GLOBAL_CSS: &str = r#"
html, body {
    margin: 0;
    padding: 0;
    font-family: system-ui, sans-serif;
    background: #f1f5f9;
    color: #0f172a;
}

* { box-sizing: border-box; }

.app-header { text-align: center; padding: 16px; }
.app-title { margin: 0 0 4px; }
.legend { display: flex; gap: 16px; justify-content: center; font-size: 0.9rem; }
.marker-icon { display: inline-block; width: 12px; height: 12px; border-radius: 50%; margin-right: 4px; vertical-align: middle; }

.main-content { display: flex; flex-wrap: wrap; gap: 16px; padding: 0 16px 16px; align-items: flex-start; }
.location-card { flex: 1 1 240px; background: #fff; border-radius: 10px; padding: 16px; box-shadow: 0 4px 8px rgba(0,0,0,0.1); }
.location-card-title { margin-top: 0; font-size: 1.1rem; }
.location-details p { margin: 4px 0; }
.error-message { color: #b91c1c; }
.notice { color: #b45309; font-size: 0.9rem; }
.gps-button { padding: 8px 14px; border: none; border-radius: 999px; background: #dc2626; color: #fff; cursor: pointer; margin-bottom: 8px; }

.map-section { flex: 2 1 420px; }
.map-container { width: 100%; height: 400px; border-radius: 10px; box-shadow: 0 4px 8px rgba(0,0,0,0.1); }
.tracker-dot { background: transparent; border: none; }
"#;

#[component]
pub fn App() -> Element {
    let tracker = use_signal(Tracker::<LeafletMap>::new);
    let life = use_hook(Lifetime::new);
    let ip_locator = use_hook(|| Rc::new(IpLocator::new(HttpIpSource::new(settings::ip_lookup_url()))));

    {
        let life = life.clone();
        use_drop(move || {
            life.end();
        });
    }

    // IP lookup: once, on mount. The locator itself refuses a second run.
    {
        let life = life.clone();
        use_future(move || {
            let life = life.clone();
            let ip_locator = ip_locator.clone();
            let mut tracker = tracker;
            async move {
                if let Some(lookup) = ip_locator.locate_once().await {
                    life.deliver(lookup, |lookup| tracker.write().on_ip_lookup(lookup));
                }
            }
        });
    }

    let request_gps = {
        let life = life.clone();
        move |_| {
            let life = life.clone();
            let mut tracker = tracker;
            spawn(async move {
                let locator = GpsLocator::new(WebviewGeolocation::detect().await);
                let result = locator.locate().await;
                life.deliver(result, |result| tracker.write().on_gps_result(result));
            });
        }
    };

    let model = tracker.read().model().clone();
    let ip_color = MarkerColor::for_marker(MarkerId::Ip).css();
    let gps_color = MarkerColor::for_marker(MarkerId::Gps).css();

    rsx! {
        document::Style { {GLOBAL_CSS} }
        document::Link { rel: "stylesheet", href: "/vendor/leaflet/leaflet.css" }
        document::Script { src: "/vendor/leaflet/leaflet.js" }

        div { class: "app-container",
            header { class: "app-header",
                h1 { class: "app-title", "🌍 Location Tracker" }
                p { "View your IP and GPS locations on the map" }
                div { class: "legend",
                    span {
                        span { class: "marker-icon", style: "background-color: {ip_color};" }
                        "IP Location"
                    }
                    span {
                        span { class: "marker-icon", style: "background-color: {gps_color};" }
                        "Browser GPS Location"
                    }
                }
            }

            main { class: "main-content",
                IpCard { model: model.clone() }
                MapPanel { tracker }
                GpsCard { model, on_request: request_gps }
            }
        }
    }
}
