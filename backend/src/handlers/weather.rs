//! HTTP handlers for weather endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{DailyWeatherRecord, RadarSample};
use shared::types::{DataOutcome, GpsCoordinates};

use crate::error::{AppError, AppResult};
use crate::external::weather::GeocodedPlace;
use crate::AppState;

/// Query parameters for geocoding
#[derive(Debug, Deserialize)]
pub struct GeocodeQuery {
    pub q: String,
}

/// Query parameters for a location
#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl LocationQuery {
    fn coordinates(&self) -> AppResult<GpsCoordinates> {
        let location = GpsCoordinates::new(self.latitude, self.longitude);
        shared::validate_coordinates(&location)
            .map_err(|msg| AppError::invalid_field("latitude", msg))?;
        Ok(location)
    }
}

/// Query parameters for the daily forecast
#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub latitude: Decimal,
    pub longitude: Decimal,
    /// Crop coefficient of the variety
    pub kc: Option<f64>,
    pub base_temperature: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ForecastResponse {
    pub location: GpsCoordinates,
    pub records: DataOutcome<Vec<DailyWeatherRecord>>,
}

#[derive(Debug, Serialize)]
pub struct RadarResponse {
    pub center: GpsCoordinates,
    pub samples: Vec<RadarSample>,
    pub raining_directions: usize,
}

/// Resolve a place name to coordinates
pub async fn geocode(
    State(state): State<AppState>,
    Query(query): Query<GeocodeQuery>,
) -> AppResult<Json<GeocodedPlace>> {
    shared::validate_location_query(&query.q).map_err(|msg| AppError::invalid_field("q", msg))?;

    match state.weather.locate(query.q.trim()).await {
        DataOutcome::Available(place) => Ok(Json(place)),
        DataOutcome::Empty => Err(AppError::NotFound(format!("Location '{}'", query.q.trim()))),
        DataOutcome::Unavailable { .. } => Err(AppError::WeatherServiceUnavailable),
    }
}

/// Get daily agronomic records for a location
pub async fn get_daily_forecast(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> AppResult<Json<ForecastResponse>> {
    let location = LocationQuery {
        latitude: query.latitude,
        longitude: query.longitude,
    }
    .coordinates()?;

    let kc = query.kc.unwrap_or(1.0);
    shared::validate_crop_coefficient(kc).map_err(|msg| AppError::invalid_field("kc", msg))?;
    let base_temperature = query.base_temperature.unwrap_or(10.0);
    shared::validate_base_temperature(base_temperature)
        .map_err(|msg| AppError::invalid_field("base_temperature", msg))?;

    let records = state
        .weather
        .daily_records(location, kc, base_temperature)
        .await;

    Ok(Json(ForecastResponse { location, records }))
}

/// Get the four-point radar snapshot around a location
pub async fn get_radar(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> AppResult<Json<RadarResponse>> {
    let center = query.coordinates()?;
    let samples = state.weather.radar(center).await;

    Ok(Json(RadarResponse {
        center,
        raining_directions: samples.iter().filter(|s| s.is_raining).count(),
        samples,
    }))
}
