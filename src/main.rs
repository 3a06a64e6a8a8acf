// SPDX-License-Identifier: MIT

//! SATAS API Server
//!
//! Two-sided marketplace backend connecting startups with individual
//! job/event seekers.

use satas_api::{
    config::Config,
    db::Database,
    services::{IdentityClient, StorageClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting SATAS API");

    // Initialize Postgres and run migrations
    let db = Database::new(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    // Identity provider client
    let identity = IdentityClient::new(
        &config.identity_url,
        &config.identity_client_id,
        &config.identity_client_secret,
    );
    tracing::info!(url = %config.identity_url, "Identity provider client initialized");

    // Object storage client
    let storage = StorageClient::new(&config.storage_url, &config.storage_service_key);
    tracing::info!(url = %config.storage_url, "Object storage client initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        identity,
        storage,
    });

    // Build router
    let app = satas_api::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("satas_api=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
