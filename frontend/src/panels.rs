use dioxus::prelude::*;
use tracker_shared::presenter::{gps_detail_lines, ip_detail_lines, DetailLine};
use tracker_shared::view_model::{GpsPanel, IpPanel};
use tracker_shared::ViewModel;

#[component]
fn DetailList(lines: Vec<DetailLine>) -> Element {
    rsx! {
        div { class: "location-details",
            {lines.into_iter().map(|DetailLine { label, value }| rsx! {
                p { key: "{label}",
                    strong { "{label}: " }
                    "{value}"
                }
            })}
        }
    }
}

#[component]
pub fn IpCard(model: ViewModel) -> Element {
    let body = match model.ip_panel() {
        IpPanel::Loading => rsx! { p { "Loading IP location..." } },
        IpPanel::Details(location) => rsx! { DetailList { lines: ip_detail_lines(location) } },
        IpPanel::Error { message, position } => {
            let (lat, lng) = (position.lat, position.lng);
            rsx! {
                div { class: "error-message",
                    p { "{message}" }
                    p { "Using default location ({lat},{lng})" }
                }
            }
        }
    };

    rsx! {
        div { class: "location-card ip-location",
            h2 { class: "location-card-title", "🌐 IP-Based Location" }
            {body}
        }
    }
}

#[component]
pub fn GpsCard(model: ViewModel, on_request: EventHandler<()>) -> Element {
    let body = match model.gps_panel() {
        GpsPanel::Prompt => rsx! { p { "Click the button to get your GPS location" } },
        GpsPanel::Fix(fix) => {
            let notice = model.gps_notice().map(|err| err.to_string());
            rsx! {
                DetailList { lines: gps_detail_lines(fix) }
                if let Some(notice) = notice {
                    p { class: "notice", "Latest request failed: {notice}" }
                }
            }
        }
        GpsPanel::Error(err) => rsx! { p { class: "error-message", "Error: {err}" } },
    };

    rsx! {
        div { class: "location-card gps-location",
            h2 { class: "location-card-title", "📍 Browser GPS Location" }
            button { class: "gps-button", onclick: move |_| on_request.call(()),
                "Get My Precise Location"
            }
            {body}
        }
    }
}
