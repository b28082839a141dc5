//! HTTP handlers for field assessments

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::services::assessment::{AssessmentRequest, FieldAssessment};
use crate::AppState;

/// Assess a crop phase at a location
pub async fn create_assessment(
    State(state): State<AppState>,
    Json(input): Json<AssessmentRequest>,
) -> AppResult<Json<FieldAssessment>> {
    let assessment = state.assessments.assess(input).await?;
    Ok(Json(assessment))
}
