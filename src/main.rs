//! brew-watch server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use brew_watch::api;
use brew_watch::app_state::AppState;
use brew_watch::client::{BrewApi, HttpBrewApi};
use brew_watch::config::WatchConfig;
use brew_watch::domain::EventBus;
use brew_watch::service::BrewService;
use brew_watch::tracker::{SystemClock, TrackerRegistry};
use brew_watch::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = WatchConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(
        addr = %config.listen_addr,
        backend = %config.brew_api_url,
        "starting brew-watch"
    );

    // Build client and tracker layer
    let api: Arc<dyn BrewApi> = Arc::new(
        HttpBrewApi::new(&config.brew_api_url, config.http_timeout)
            .context("building brewing backend client")?,
    );
    let event_bus = EventBus::new(config.event_bus_capacity);
    let registry = Arc::new(TrackerRegistry::new(
        Arc::clone(&api),
        Arc::new(SystemClock),
        event_bus.clone(),
        config.tracker_options(),
    ));

    // Build service layer
    let brew_service = Arc::new(BrewService::new(registry, api, event_bus.clone()));

    for brew_id in &config.watch_brew_ids {
        if let Err(e) = brew_service.mount_tracker(brew_id.clone()).await {
            tracing::warn!(%brew_id, error = %e, "could not watch brew at startup");
        }
    }

    // Build application state
    let app_state = AppState {
        brew_service: Arc::clone(&brew_service),
        event_bus,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let stopped = brew_service.shutdown().await;
    tracing::info!(trackers = stopped, "shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
