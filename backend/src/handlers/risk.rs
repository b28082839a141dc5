//! HTTP handlers for spray-window risk classification

use axum::Json;
use serde::{Deserialize, Serialize};
use shared::models::{classify, ActionType, RiskVerdict};
use shared::physics;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Input for classifying a spray window
#[derive(Debug, Deserialize, Validate)]
pub struct ClassifyRequest {
    pub temperature: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity: f64,
    /// Measured Delta T; derived from temperature and humidity when absent
    pub wet_bulb_depression: Option<f64>,
    /// Product-type label (e.g. "Químico Sistêmico")
    #[validate(length(max = 200))]
    pub product_type: String,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub product_type: ActionType,
    pub vapor_pressure_deficit: f64,
    pub wet_bulb_depression: f64,
    #[serde(flatten)]
    pub verdict: RiskVerdict,
}

/// Classify a spray window
pub async fn classify_spray_window(
    Json(input): Json<ClassifyRequest>,
) -> AppResult<Json<ClassifyResponse>> {
    input.validate()?;
    shared::validate_temperature(input.temperature)
        .map_err(|msg| AppError::invalid_field("temperature", msg))?;
    shared::validate_humidity(input.humidity)
        .map_err(|msg| AppError::invalid_field("humidity", msg))?;

    let wet_bulb_depression = match input.wet_bulb_depression {
        Some(delta_t) => {
            shared::validate_wet_bulb_depression(delta_t)
                .map_err(|msg| AppError::invalid_field("wet_bulb_depression", msg))?;
            delta_t
        }
        None => physics::wet_bulb_depression(input.temperature, input.humidity),
    };

    let product_type = ActionType::from_label(&input.product_type);
    let verdict = classify(
        input.temperature,
        input.humidity,
        wet_bulb_depression,
        product_type,
    );

    Ok(Json(ClassifyResponse {
        product_type,
        vapor_pressure_deficit: physics::round_to(
            physics::vapor_pressure_deficit(input.temperature, input.humidity),
            2,
        ),
        wet_bulb_depression,
        verdict,
    }))
}
