//! Agronomic Decision Engine - backend library
//!
//! Serves the crop catalog, daily agronomic weather records, the radar
//! approximation and spray-window risk verdicts over a JSON API.

use axum::{routing::get, Router};
use shared::catalog::{Catalog, MergeReport};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;

pub use config::Config;

use external::WeatherProvider;
use services::{AssessmentService, WeatherService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<Catalog>,
    pub report: Arc<MergeReport>,
    pub weather: WeatherService,
    pub assessments: AssessmentService,
}

impl AppState {
    pub fn new(
        config: Config,
        catalog: Catalog,
        report: MergeReport,
        provider: Arc<dyn WeatherProvider>,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let weather = WeatherService::new(provider, &config.weather);
        let assessments = AssessmentService::new(Arc::clone(&catalog), weather.clone());

        Self {
            config: Arc::new(config),
            catalog,
            report: Arc::new(report),
            weather,
            assessments,
        }
    }
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Agronomic Decision Engine API v1.0"
}
