//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub crops: usize,
    pub fragments_merged: usize,
    pub fragments_skipped: usize,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        crops: state.catalog.len(),
        fragments_merged: state.report.merged_count(),
        fragments_skipped: state.report.skipped_count(),
    })
}
