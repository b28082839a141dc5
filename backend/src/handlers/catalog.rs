//! HTTP handlers for crop catalog endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use shared::catalog::{MergeReport, NO_PROTOCOL};
use shared::models::{ChemicalEntry, Crop, CropSummary};

use crate::error::{AppError, AppResult};
use crate::AppState;

/// Chemical protocol of one phase
#[derive(Debug, Serialize)]
pub struct PhaseProtocolResponse {
    pub crop: String,
    pub phase: String,
    pub entries: Vec<ChemicalEntry>,
    /// Set when the knowledge base has no protocol for the phase
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct KnowledgeBaseReportResponse {
    pub aliases_version: String,
    pub crops: usize,
    pub report: MergeReport,
}

/// List crops in the catalog
pub async fn list_crops(State(state): State<AppState>) -> Json<Vec<CropSummary>> {
    Json(state.catalog.summaries())
}

/// Get a crop with its varieties and phases
pub async fn get_crop(
    State(state): State<AppState>,
    Path(crop): Path<String>,
) -> AppResult<Json<Crop>> {
    state
        .catalog
        .crop(&crop)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Crop '{}'", crop)))
}

/// Get the chemical protocol for a crop phase
pub async fn get_phase_protocol(
    State(state): State<AppState>,
    Path((crop_name, phase_name)): Path<(String, String)>,
) -> AppResult<Json<PhaseProtocolResponse>> {
    let crop = state
        .catalog
        .crop(&crop_name)
        .ok_or_else(|| AppError::NotFound(format!("Crop '{}'", crop_name)))?;
    let phase = crop
        .phase(&phase_name)
        .ok_or_else(|| AppError::NotFound(format!("Phase '{}'", phase_name)))?;

    Ok(Json(PhaseProtocolResponse {
        crop: crop.name.clone(),
        phase: phase.name.clone(),
        entries: phase.protocol().to_vec(),
        note: phase
            .chemical_protocol
            .is_none()
            .then(|| NO_PROTOCOL.to_string()),
    }))
}

/// Get the knowledge-base load report
pub async fn get_knowledge_base_report(
    State(state): State<AppState>,
) -> Json<KnowledgeBaseReportResponse> {
    Json(KnowledgeBaseReportResponse {
        aliases_version: state.catalog.aliases_version().to_string(),
        crops: state.catalog.len(),
        report: state.report.as_ref().clone(),
    })
}
