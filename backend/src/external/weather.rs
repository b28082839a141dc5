//! Weather API client for fetching forecast, point conditions and geocoding
//!
//! Integrates with OpenWeatherMap for the 5-day/3-hour forecast, current
//! conditions at a point (radar probes) and direct geocoding.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared::models::{ForecastSample, PointConditions};
use shared::types::GpsCoordinates;

use crate::config::WeatherConfig;
use crate::error::{AppError, AppResult};

/// A place resolved by the geocoding API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeocodedPlace {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub coordinates: GpsCoordinates,
}

/// Source of weather data
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Resolve a free-text place name; `None` when nothing matched
    async fn geocode(&self, query: &str) -> AppResult<Option<GeocodedPlace>>;

    /// Short-range 3-hourly forecast series
    async fn forecast_series(&self, location: GpsCoordinates) -> AppResult<Vec<ForecastSample>>;

    /// Current conditions at a single point
    async fn point_conditions(&self, location: GpsCoordinates) -> AppResult<PointConditions>;
}

/// Weather API client
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
    geocoding_url: String,
    language: String,
}

/// OpenWeatherMap API response for current weather
#[derive(Debug, Deserialize)]
struct OWMCurrentResponse {
    weather: Vec<OWMWeather>,
    main: OWMMain,
    rain: Option<OWMRain>,
}

#[derive(Debug, Deserialize)]
struct OWMWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OWMMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OWMRain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
    #[serde(rename = "3h")]
    three_hour: Option<f64>,
}

/// OpenWeatherMap API response for forecast
#[derive(Debug, Deserialize)]
struct OWMForecastResponse {
    list: Vec<OWMForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OWMForecastItem {
    dt: i64,
    main: OWMForecastMain,
    #[serde(default)]
    weather: Vec<OWMWeather>,
    rain: Option<OWMRain>,
}

/// Forecast `main` block; humidity is required
#[derive(Debug, Deserialize)]
struct OWMForecastMain {
    temp: f64,
    humidity: f64,
}

/// OpenWeatherMap direct geocoding entry
#[derive(Debug, Deserialize)]
struct OWMGeocodeEntry {
    name: String,
    lat: f64,
    lon: f64,
    country: Option<String>,
    state: Option<String>,
}

impl WeatherClient {
    /// Create a new WeatherClient from configuration
    pub fn new(config: &WeatherConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AppError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
            geocoding_url: config.geocoding_endpoint.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    /// Create a new WeatherClient with custom base URLs (for testing)
    pub fn with_base_url(api_key: String, base_url: String, geocoding_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url,
            geocoding_url,
            language: "pt_br".to_string(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        if self.api_key.is_empty() {
            return Err(AppError::Configuration("weather API key is not set".to_string()));
        }

        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::WeatherServiceUnavailable
                } else {
                    AppError::WeatherProvider(format!("request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::WeatherProvider(format!("{} - {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::WeatherProvider(format!("failed to parse response: {}", e)))
    }

    fn location_params(&self, location: GpsCoordinates) -> Vec<(&'static str, String)> {
        vec![
            ("lat", location.latitude.to_string()),
            ("lon", location.longitude.to_string()),
            ("units", "metric".to_string()),
            ("lang", self.language.clone()),
        ]
    }
}

#[async_trait]
impl WeatherProvider for WeatherClient {
    async fn geocode(&self, query: &str) -> AppResult<Option<GeocodedPlace>> {
        let url = format!("{}/direct", self.geocoding_url);
        let params = [("q", query.to_string()), ("limit", "1".to_string())];
        let entries: Vec<OWMGeocodeEntry> = self.get_json(&url, &params).await?;
        Ok(entries.into_iter().next().map(convert_geocode_entry))
    }

    async fn forecast_series(&self, location: GpsCoordinates) -> AppResult<Vec<ForecastSample>> {
        let url = format!("{}/forecast", self.base_url);
        let data: OWMForecastResponse = self.get_json(&url, &self.location_params(location)).await?;
        convert_forecast_response(data)
    }

    async fn point_conditions(&self, location: GpsCoordinates) -> AppResult<PointConditions> {
        let url = format!("{}/weather", self.base_url);
        let data: OWMCurrentResponse = self.get_json(&url, &self.location_params(location)).await?;
        Ok(convert_current_response(data))
    }
}

fn describe(weather: &[OWMWeather]) -> String {
    weather
        .first()
        .map(|w| {
            if w.description.is_empty() {
                w.main.clone()
            } else {
                w.description.clone()
            }
        })
        .unwrap_or_default()
}

fn to_degrees(value: f64) -> Decimal {
    Decimal::from_f64_retain(value)
        .unwrap_or_default()
        .round_dp(6)
}

/// Convert OpenWeatherMap current response to point conditions
fn convert_current_response(data: OWMCurrentResponse) -> PointConditions {
    PointConditions {
        temperature_celsius: data.main.temp,
        condition: describe(&data.weather),
        rain_mm: data
            .rain
            .map(|r| r.one_hour.or(r.three_hour).unwrap_or(0.0)),
    }
}

/// Convert OpenWeatherMap forecast response to raw samples.
///
/// An out-of-range timestamp fails the whole series.
fn convert_forecast_response(data: OWMForecastResponse) -> AppResult<Vec<ForecastSample>> {
    data.list
        .into_iter()
        .map(|item| {
            let timestamp = DateTime::<Utc>::from_timestamp(item.dt, 0).ok_or_else(|| {
                AppError::WeatherProvider(format!("invalid forecast timestamp {}", item.dt))
            })?;
            Ok(ForecastSample {
                timestamp,
                temperature_celsius: item.main.temp,
                humidity_percent: item.main.humidity,
                precipitation_mm: item.rain.and_then(|r| r.three_hour).unwrap_or(0.0),
                condition: describe(&item.weather),
            })
        })
        .collect()
}

fn convert_geocode_entry(entry: OWMGeocodeEntry) -> GeocodedPlace {
    GeocodedPlace {
        name: entry.name,
        state: entry.state,
        country: entry.country,
        coordinates: GpsCoordinates::new(to_degrees(entry.lat), to_degrees(entry.lon)),
    }
}
