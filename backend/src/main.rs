//! Agronomic Decision Engine - Backend Server
//!
//! Loads the crop knowledge base once at startup and serves spraying and
//! irrigation decision support for a crop, phase and location.

use agro_decision_backend::{
    create_app, external::WeatherClient, services::knowledge_base, AppState, Config,
};
use std::{net::SocketAddr, path::Path, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "agro_server=debug,agro_decision_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Agronomic Decision Engine Server");
    tracing::info!("Environment: {}", config.environment);

    if config.weather.api_key.is_empty() {
        tracing::warn!("Weather API key not set; forecast and radar will report unavailable data");
    }

    // Build the crop catalog
    let aliases = config.knowledge_base.field_aliases();
    let (catalog, report) =
        knowledge_base::load_catalog(Path::new(&config.knowledge_base.root_dir), &aliases)?;

    let provider = Arc::new(WeatherClient::new(&config.weather)?);
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Create application state
    let state = AppState::new(config, catalog, report, provider);

    // Build application
    let app = create_app(state);

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
