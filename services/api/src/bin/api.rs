//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, LocalFileStorage},
    config::Config,
    error::ApiError,
    web::{router, state::AppState},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect to Database & Run Migrations ---
    info!("Connecting to database at {}...", config.database_url);
    let db_adapter = DbAdapter::connect(&config.database_url).await?;
    info!("Running database migrations...");
    db_adapter.run_migrations().await?;
    info!("Database migrations complete.");

    // --- 3. Prepare the Upload Directory ---
    let storage = LocalFileStorage::new(&config.upload_dir);
    storage.ensure_root().await?;
    info!("Storing uploads under {}", config.upload_dir.display());

    // --- 4. Build the Shared AppState and Router ---
    let app_state = Arc::new(AppState {
        db: Arc::new(db_adapter),
        storage: Arc::new(storage),
        config: config.clone(),
    });
    let app = router(app_state);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
