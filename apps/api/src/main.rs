mod billing;
mod config;
mod db;
mod document;
mod errors;
mod features;
mod models;
mod portfolio;
mod routes;
mod state;
mod telemetry;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::config::Config;
use crate::db::create_pool;
use crate::portfolio::domain::HttpDomainProvider;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging; the guard's drop is the shutdown step
    let _telemetry = telemetry::init(&config.rust_log);

    info!("Starting Portfolio API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url, config.database_max_connections).await?;

    // Initialize hosting-provider client for custom domains
    let domains = Arc::new(HttpDomainProvider::new(
        config.domain_provider_url.clone(),
        config.domain_provider_token.clone(),
    ));
    info!("Domain provider client initialized");

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        domains,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
