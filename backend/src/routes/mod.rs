//! Route definitions for the agronomic decision engine

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Crop catalog
        .nest("/crops", crop_routes())
        // Knowledge-base diagnostics
        .route("/knowledge-base/report", get(handlers::get_knowledge_base_report))
        // Weather data
        .nest("/weather", weather_routes())
        // Risk classification
        .route("/risk/classify", post(handlers::classify_spray_window))
        // Field assessments
        .route("/assessments", post(handlers::create_assessment))
}

/// Crop catalog routes
fn crop_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_crops))
        .route("/:crop", get(handlers::get_crop))
        .route(
            "/:crop/phases/:phase/protocol",
            get(handlers::get_phase_protocol),
        )
}

/// Weather routes
fn weather_routes() -> Router<AppState> {
    Router::new()
        .route("/geocode", get(handlers::geocode))
        .route("/forecast", get(handlers::get_daily_forecast))
        .route("/radar", get(handlers::get_radar))
}
