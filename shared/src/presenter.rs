// Projection of the view model into what the map widget and panels draw.

use crate::location::{DEFAULT_CENTER, GpsFix, IpLocation, IpLookup, Position};
use crate::view_model::{ActiveMarker, MarkerId, ViewModel};
use serde::Serialize;

/// Zoom before the IP lookup resolves.
pub const WORLD_ZOOM: u8 = 2;
/// Zoom once the IP lookup resolved, success or fallback.
pub const CITY_ZOOM: u8 = 10;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerColor {
    Blue,
    Red,
}

impl MarkerColor {
    pub fn for_marker(id: MarkerId) -> Self {
        match id {
            MarkerId::Ip => Self::Blue,
            MarkerId::Gps => Self::Red,
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            Self::Blue => "#2563eb",
            Self::Red => "#dc2626",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerView {
    pub id: MarkerId,
    pub position: Position,
    pub color: MarkerColor,
    pub css_color: &'static str,
    pub title: &'static str,
    pub popup: Vec<String>,
    pub open: bool,
}

/// Everything the map widget needs for one render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Position,
    pub zoom: u8,
    pub markers: Vec<MarkerView>,
    pub active: ActiveMarker,
}

impl MapView {
    pub fn project(model: &ViewModel) -> Self {
        let active = model.active_marker();
        let mut markers = Vec::with_capacity(2);

        if let Some(lookup) = model.ip() {
            markers.push(marker(MarkerId::Ip, lookup.position(), ip_popup(lookup), active));
        }
        if let Some(fix) = model.gps() {
            markers.push(marker(MarkerId::Gps, fix.position, gps_popup(fix), active));
        }

        let (center, zoom) = match model.ip() {
            Some(lookup) => (lookup.position(), CITY_ZOOM),
            None => (DEFAULT_CENTER, WORLD_ZOOM),
        };

        Self {
            center,
            zoom,
            markers,
            active,
        }
    }
}

fn marker(id: MarkerId, position: Position, popup: Vec<String>, active: ActiveMarker) -> MarkerView {
    let color = MarkerColor::for_marker(id);
    MarkerView {
        id,
        position,
        color,
        css_color: color.css(),
        title: match id {
            MarkerId::Ip => "IP Location",
            MarkerId::Gps => "Your GPS Location",
        },
        popup,
        open: active.is(id),
    }
}

/// One `label: value` row of a location panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailLine {
    pub label: &'static str,
    pub value: String,
}

fn line(label: &'static str, value: impl Into<String>) -> DetailLine {
    DetailLine {
        label,
        value: value.into(),
    }
}

fn or_na(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn ip_detail_lines(location: &IpLocation) -> Vec<DetailLine> {
    vec![
        line("IP", or_na(Some(location.ip.as_str()))),
        line("ISP", or_na(location.org.as_deref())),
        line("City", or_na(location.city.as_deref())),
        line("Region", or_na(location.region.as_deref())),
        line("Country", or_na(location.country_name.as_deref())),
        line("Latitude", location.latitude.to_string()),
        line("Longitude", location.longitude.to_string()),
    ]
}

pub fn gps_detail_lines(fix: &GpsFix) -> Vec<DetailLine> {
    vec![
        line("Accuracy", format_accuracy(fix.accuracy)),
        line("Latitude", format!("{:.6}", fix.latitude)),
        line("Longitude", format!("{:.6}", fix.longitude)),
        line("Altitude", format_altitude(fix.altitude)),
    ]
}

fn format_accuracy(accuracy: f64) -> String {
    if accuracy.is_finite() {
        format!("{} meters", accuracy.round() as i64)
    } else {
        NOT_AVAILABLE.to_string()
    }
}

fn format_altitude(altitude: Option<f64>) -> String {
    match altitude {
        Some(a) => format!("{a:.2} meters"),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn ip_popup(lookup: &IpLookup) -> Vec<String> {
    match lookup {
        IpLookup::Located(location) => {
            let place = [&location.city, &location.region, &location.country_name]
                .into_iter()
                .map(|part| or_na(part.as_deref()))
                .collect::<Vec<_>>()
                .join(", ");
            vec![place, format!("IP: {}", or_na(Some(location.ip.as_str())))]
        }
        IpLookup::Fallback { error, position } => vec![
            error.clone(),
            format!("Using default location ({},{})", position.lat, position.lng),
        ],
    }
}

fn gps_popup(fix: &GpsFix) -> Vec<String> {
    gps_detail_lines(fix)
        .into_iter()
        .map(|l| format!("{}: {}", short_label(l.label), l.value))
        .collect()
}

fn short_label(label: &'static str) -> &'static str {
    match label {
        "Latitude" => "Lat",
        "Longitude" => "Lng",
        other => other,
    }
}
