//! Field assessment: one decision surface for a crop, phase and location
//!
//! Resolves the location, fetches the forecast and the radar concurrently,
//! classifies the current record and attaches the phase protocol.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::catalog::{Catalog, NO_PROTOCOL};
use shared::forecast;
use shared::models::{
    classify, ActionType, ChemicalEntry, CockpitIndicators, Crop, DailyWeatherRecord, Phase,
    RadarSample, RiskVerdict, ThermalProgress, Variety,
};
use shared::types::{DataOutcome, GpsCoordinates};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::external::weather::GeocodedPlace;
use crate::services::weather::WeatherService;

/// Input for a field assessment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssessmentRequest {
    #[validate(length(min = 1, max = 200))]
    pub crop: String,
    #[validate(length(min = 1, max = 200))]
    pub variety: String,
    #[validate(length(min = 1, max = 200))]
    pub phase: String,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
    /// Place name, used when coordinates are not given
    #[validate(length(min = 1, max = 200))]
    pub location_query: Option<String>,
    /// Product-type label; derived from the phase protocol when absent
    #[validate(length(max = 200))]
    pub product_type: Option<String>,
}

/// Everything the field cockpit shows for one request
#[derive(Debug, Clone, Serialize)]
pub struct FieldAssessment {
    pub crop: String,
    pub variety: String,
    pub phase: String,
    pub location: GpsCoordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place: Option<GeocodedPlace>,
    pub product_type: ActionType,
    pub records: DataOutcome<Vec<DailyWeatherRecord>>,
    /// `None` when no forecast record is available
    pub verdict: Option<RiskVerdict>,
    pub cockpit: Option<CockpitIndicators>,
    pub radar: Vec<RadarSample>,
    pub thermal_progress: ThermalProgress,
    pub physiology_note: String,
    pub management_note: String,
    pub protocol: Vec<ChemicalEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol_note: Option<String>,
}

/// Assessment service over the catalog and the weather service
#[derive(Clone)]
pub struct AssessmentService {
    catalog: Arc<Catalog>,
    weather: WeatherService,
}

impl AssessmentService {
    pub fn new(catalog: Arc<Catalog>, weather: WeatherService) -> Self {
        Self { catalog, weather }
    }

    pub async fn assess(&self, request: AssessmentRequest) -> AppResult<FieldAssessment> {
        request.validate()?;

        let (crop, variety, phase) = self.selection(&request)?;
        let (location, place) = self.resolve_location(&request).await?;

        let product_type = request
            .product_type
            .as_deref()
            .map(ActionType::from_label)
            .unwrap_or_else(|| protocol_action_type(phase));

        let (records, radar) = tokio::join!(
            self.weather
                .daily_records(location, variety.crop_coefficient, crop.base_temperature),
            self.weather.radar(location)
        );

        let current = records.items().first();
        let verdict = current.map(|r| {
            classify(
                r.temperature,
                r.relative_humidity,
                r.wet_bulb_depression,
                product_type,
            )
        });
        let cockpit = current.map(CockpitIndicators::from);
        let thermal_progress =
            forecast::thermal_progress(records.items(), variety.thermal_unit_target);

        if let Some(verdict) = &verdict {
            tracing::info!(
                crop = %crop.name,
                phase = %phase.name,
                status = %verdict.overall_status,
                alerts = verdict.alerts.len(),
                "Field assessment classified"
            );
        } else {
            tracing::warn!(crop = %crop.name, "Field assessment without forecast data");
        }

        Ok(FieldAssessment {
            crop: crop.name.clone(),
            variety: variety.name.clone(),
            phase: phase.name.clone(),
            location,
            place,
            product_type,
            records,
            verdict,
            cockpit,
            radar,
            thermal_progress,
            physiology_note: phase.physiology_note.clone(),
            management_note: phase.management_note.clone(),
            protocol: phase.protocol().to_vec(),
            protocol_note: phase
                .chemical_protocol
                .is_none()
                .then(|| NO_PROTOCOL.to_string()),
        })
    }

    fn selection<'a>(
        &'a self,
        request: &AssessmentRequest,
    ) -> AppResult<(&'a Crop, &'a Variety, &'a Phase)> {
        let crop = self
            .catalog
            .crop(&request.crop)
            .ok_or_else(|| AppError::NotFound(format!("Crop '{}'", request.crop)))?;
        let variety = crop
            .variety(&request.variety)
            .ok_or_else(|| AppError::NotFound(format!("Variety '{}'", request.variety)))?;
        let phase = crop
            .phase(&request.phase)
            .ok_or_else(|| AppError::NotFound(format!("Phase '{}'", request.phase)))?;
        Ok((crop, variety, phase))
    }

    async fn resolve_location(
        &self,
        request: &AssessmentRequest,
    ) -> AppResult<(GpsCoordinates, Option<GeocodedPlace>)> {
        if let (Some(latitude), Some(longitude)) = (request.latitude, request.longitude) {
            let location = GpsCoordinates::new(latitude, longitude);
            shared::validate_coordinates(&location)
                .map_err(|msg| AppError::invalid_field("latitude", msg))?;
            return Ok((location, None));
        }

        let query = request
            .location_query
            .as_deref()
            .ok_or_else(|| {
                AppError::invalid_field("location_query", "Coordinates or a place name are required")
            })?;

        match self.weather.locate(query).await {
            DataOutcome::Available(place) => Ok((place.coordinates, Some(place))),
            DataOutcome::Empty => Err(AppError::NotFound(format!("Location '{}'", query))),
            DataOutcome::Unavailable { .. } => Err(AppError::WeatherServiceUnavailable),
        }
    }
}

/// Product type implied by a phase protocol.
///
/// Any systemic entry makes the phase systemic so the uptake rule is checked.
pub fn protocol_action_type(phase: &Phase) -> ActionType {
    let protocol = phase.protocol();
    if protocol.iter().any(|entry| entry.action_type.is_systemic()) {
        ActionType::Systemic
    } else {
        protocol
            .first()
            .map(|entry| entry.action_type)
            .unwrap_or(ActionType::Other)
    }
}
