// frontend/src/map.rs
//
// Leaflet bridge. The map lives entirely on the JS side; Rust pushes a
// serialized MapView and gets clicks back over the eval channel.

use crate::settings;
use dioxus::prelude::*;
use serde::Deserialize;
use tracker_shared::{MapHandle, MapView, MarkerId, Position, Tracker};

const MAP_ELEMENT_ID: &str = "tracker-map";

/// Handle to the Leaflet map created by [`MapPanel`].
pub struct LeafletMap;

impl MapHandle for LeafletMap {
    fn pan_to(&self, position: Position) {
        if !position.is_finite() {
            return;
        }
        document::eval(&format!(
            "if (typeof window.__tracker_pan === 'function') window.__tracker_pan({}, {});",
            position.lat, position.lng
        ));
    }
}

/// Events the JS side reports back.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum MapEvent {
    Ready,
    MapClick,
    MarkerClick { id: MarkerId },
    PopupClose { id: MarkerId },
}

#[component]
pub fn MapPanel(tracker: Signal<Tracker<LeafletMap>>) -> Element {
    // Bridge: one long-lived eval that builds the map and streams its events.
    use_future(move || async move {
        let mut tracker = tracker;
        let mut bridge = document::eval(&init_script());
        loop {
            // Decoded here so one bad message does not end the channel.
            let raw = match bridge.recv::<serde_json::Value>().await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("map bridge closed: {e:?}");
                    break;
                }
            };
            let event = match serde_json::from_value::<MapEvent>(raw) {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!("ignoring undecodable map event: {e}");
                    continue;
                }
            };

            tracing::debug!(?event, "map event");
            let mut t = tracker.write();
            match event {
                MapEvent::Ready => t.on_map_load(LeafletMap),
                MapEvent::MapClick => t.on_map_click(),
                MapEvent::MarkerClick { id } => t.on_marker_click(id),
                MapEvent::PopupClose { id } => t.on_popup_close(id),
            }
        }
    });

    // Push the projection whenever the model changes.
    use_effect(move || {
        let view = tracker.read().view();
        render(&view);
    });

    rsx! {
        section { class: "map-section",
            div { id: MAP_ELEMENT_ID, class: "map-container" }
        }
    }
}

fn render(view: &MapView) {
    let json = match serde_json::to_string(view) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("failed to serialize map view: {e}");
            return;
        }
    };
    // Always park the latest view so a late-initializing map can apply it.
    document::eval(&format!(
        r#"
        window.__tracker_pending = {json};
        if (typeof window.__tracker_render === "function") {{
          window.__tracker_render(window.__tracker_pending);
        }}
        "#
    ));
}

fn init_script() -> String {
    let tiles = serde_json::to_string(&settings::tile_url()).unwrap_or_else(|_| "\"\"".into());
    let attribution =
        serde_json::to_string(settings::tile_attribution()).unwrap_or_else(|_| "\"\"".into());

    INIT_SCRIPT
        .replace("__ELEMENT_ID__", MAP_ELEMENT_ID)
        .replace("__TILES__", &tiles)
        .replace("__ATTRIBUTION__", &attribution)
}


const INIT_SCRIPT: &str = r#"
const send = (event) => { try { dioxus.send(event); } catch (e) {} };

function dotIcon(color) {
  return L.divIcon({
    className: "tracker-dot",
    html: `<span style="display:block;width:16px;height:16px;border-radius:50%;background:${color};border:2px solid #fff;box-shadow:0 0 4px rgba(0,0,0,0.5);"></span>`,
    iconSize: [20, 20],
    iconAnchor: [10, 10],
    popupAnchor: [0, -10],
  });
}

function popupContent(view) {
  const root = document.createElement("div");
  const title = document.createElement("h3");
  title.textContent = view.title;
  root.appendChild(title);
  for (const line of view.popup) {
    const p = document.createElement("p");
    p.textContent = line;
    root.appendChild(p);
  }
  return root;
}

function build() {
  const el = document.getElementById("__ELEMENT_ID__");
  if (!el || typeof window.L === "undefined") return false;

  if (window.__tracker_map) {
    try { window.__tracker_map.remove(); } catch (e) {}
  }

  const map = L.map(el, { worldCopyJump: true }).setView([0, 0], 2);
  L.tileLayer(__TILES__, { maxZoom: 19, attribution: __ATTRIBUTION__ }).addTo(map);
  map.on("click", () => send({ kind: "map_click" }));

  const layers = {};
  let last = null;

  window.__tracker_map = map;
  window.__tracker_pan = (lat, lng) => map.panTo([lat, lng]);

  window.__tracker_render = function (view) {
    if (!last || last.zoom !== view.zoom ||
        last.center.lat !== view.center.lat || last.center.lng !== view.center.lng) {
      map.setView([view.center.lat, view.center.lng], view.zoom);
    }
    last = view;

    for (const id of ["ip", "gps"]) {
      const mv = view.markers.find((m) => m.id === id);
      let layer = layers[id];

      if (!mv) {
        if (layer) {
          map.closePopup(layer.popup);
          map.removeLayer(layer.marker);
          delete layers[id];
        }
        continue;
      }

      if (!layer) {
        const marker = L.marker([mv.position.lat, mv.position.lng], {
          icon: dotIcon(mv.css_color),
          title: mv.title,
        });
        marker.on("click", () => send({ kind: "marker_click", id }));
        const popup = L.popup({ autoClose: true, closeOnClick: true });
        popup.on("remove", () => send({ kind: "popup_close", id }));
        marker.addTo(map);
        layer = layers[id] = { marker, popup };
      }

      layer.marker.setLatLng([mv.position.lat, mv.position.lng]);
      layer.popup.setLatLng([mv.position.lat, mv.position.lng]);
      layer.popup.setContent(popupContent(mv));

      if (mv.open && !layer.popup.isOpen()) layer.popup.openOn(map);
      if (!mv.open && layer.popup.isOpen()) map.closePopup(layer.popup);
    }
  };

  if (window.__tracker_pending) window.__tracker_render(window.__tracker_pending);
  send({ kind: "ready" });
  return true;
}

let tries = 0;
const timer = setInterval(() => {
  tries++;
  if (build()) {
    clearInterval(timer);
  } else if (tries >= 200) {
    clearInterval(timer);
    console.warn("[tracker] Leaflet map did not initialize");
  }
}, 50);
"#;
