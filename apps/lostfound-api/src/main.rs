use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    info!(
        host = %config.mongodb.redacted_host(),
        database = config.mongodb.database(),
        "Connecting to MongoDB"
    );

    let mongo_client =
        database::mongodb::connect_from_config_with_retry(&config.mongodb, None).await?;
    let db = mongo_client.database(config.mongodb.database());

    let state = AppState {
        config,
        mongo_client,
        db,
    };

    api::items::init_storage(&state).await?;

    let api_routes = api::routes(&state);
    let pages = api::pages::router(&state.config.static_dir, &state.config.uploads.dir);

    let router = create_router::<openapi::ApiDoc>(
        api_routes,
        pages,
        state.config.allowed_origins.clone(),
    );

    let app = router.merge(health_router(state.config.app));
    let mongo_client = state.mongo_client.clone();

    info!("Starting Lost & Found API with production-ready shutdown (30s timeout)");

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing MongoDB connections");
            mongo_client.shutdown().await;
            info!("MongoDB connection closed successfully");
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Lost & Found API shutdown complete");
    Ok(())
}
