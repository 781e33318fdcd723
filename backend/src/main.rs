// main.rs

mod config;
mod state;
mod web;

use crate::config::Config;
use crate::state::AppState;
use axum::Router;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let addr = config.bind_addr;
    info!(
        provider = %config.provider_url,
        static_dir = %config.static_dir.display(),
        "starting location tracker"
    );

    if !config.static_dir.exists() {
        tracing::warn!(
            "static dir {} missing; build the frontend with `dx build` first",
            config.static_dir.display()
        );
    }

    // --- Webserver ---
    let app: Router = web::router(AppState::new(config)?);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
