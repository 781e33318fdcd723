mod app;
mod map;
mod panels;
mod settings;
mod transport;

#[cfg(target_arch = "wasm32")]
fn init_diagnostics() {
    console_error_panic_hook::set_once();
}

#[cfg(not(target_arch = "wasm32"))]
fn init_diagnostics() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn main() {
    init_diagnostics();
    dioxus::launch(app::App);
}
