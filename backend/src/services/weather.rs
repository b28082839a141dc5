//! Weather service: daily agronomic records and the radar approximation
//!
//! Provider failures never surface as errors here. They become
//! `DataOutcome::Unavailable` (forecast, geocoding) or a missing radar
//! direction, so "no data" is never mistaken for "no rain".

use futures::future::join_all;
use rust_decimal::Decimal;
use shared::forecast;
use shared::models::{CardinalDirection, DailyWeatherRecord, ForecastSample, RadarSample};
use shared::types::{DataOutcome, GpsCoordinates};
use std::sync::Arc;
use std::time::Duration;

use crate::config::WeatherConfig;
use crate::external::weather::{GeocodedPlace, WeatherProvider};

/// Weather service wrapping a provider
#[derive(Clone)]
pub struct WeatherService {
    provider: Arc<dyn WeatherProvider>,
    radar_offset: Decimal,
    radar_timeout: Duration,
}

impl WeatherService {
    pub fn new(provider: Arc<dyn WeatherProvider>, config: &WeatherConfig) -> Self {
        Self::with_radar_settings(provider, config.radar_offset_degrees, config.radar_timeout())
    }

    pub fn with_radar_settings(
        provider: Arc<dyn WeatherProvider>,
        radar_offset: Decimal,
        radar_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            radar_offset,
            radar_timeout,
        }
    }

    /// Resolve a place name to coordinates
    pub async fn locate(&self, query: &str) -> DataOutcome<GeocodedPlace> {
        match self.provider.geocode(query).await {
            Ok(Some(place)) => DataOutcome::Available(place),
            Ok(None) => DataOutcome::Empty,
            Err(e) => {
                tracing::warn!(query, error = %e, "Geocoding failed");
                DataOutcome::unavailable(e.to_string())
            }
        }
    }

    /// Raw forecast series for a location
    pub async fn forecast_samples(&self, location: GpsCoordinates) -> DataOutcome<Vec<ForecastSample>> {
        match self.provider.forecast_series(location).await {
            Ok(samples) => DataOutcome::from_items(samples),
            Err(e) => {
                tracing::warn!(
                    latitude = %location.latitude,
                    longitude = %location.longitude,
                    error = %e,
                    "Forecast fetch failed"
                );
                DataOutcome::unavailable(e.to_string())
            }
        }
    }

    /// Daily agronomic records for a location and variety
    pub async fn daily_records(
        &self,
        location: GpsCoordinates,
        crop_coefficient: f64,
        base_temperature: f64,
    ) -> DataOutcome<Vec<DailyWeatherRecord>> {
        match self.forecast_samples(location).await {
            DataOutcome::Available(samples) => DataOutcome::from_items(forecast::aggregate_daily(
                &samples,
                crop_coefficient,
                base_temperature,
            )),
            DataOutcome::Empty => DataOutcome::Empty,
            DataOutcome::Unavailable { reason } => DataOutcome::Unavailable { reason },
        }
    }

    /// Probe the four cardinal points around `center` concurrently.
    ///
    /// Failed or timed-out probes are dropped; the rest keep N, S, E, W order.
    pub async fn radar(&self, center: GpsCoordinates) -> Vec<RadarSample> {
        let probes = CardinalDirection::ALL.into_iter().map(|direction| {
            let point = self.probe_point(center, direction);
            async move {
                match tokio::time::timeout(self.radar_timeout, self.provider.point_conditions(point))
                    .await
                {
                    Ok(Ok(conditions)) => Some(RadarSample::from_conditions(direction, &conditions)),
                    Ok(Err(e)) => {
                        tracing::warn!(%direction, error = %e, "Radar probe failed");
                        None
                    }
                    Err(_) => {
                        tracing::warn!(%direction, timeout = ?self.radar_timeout, "Radar probe timed out");
                        None
                    }
                }
            }
        });

        let samples: Vec<RadarSample> = join_all(probes).await.into_iter().flatten().collect();
        tracing::debug!(probes = samples.len(), "Radar snapshot collected");
        samples
    }

    fn probe_point(&self, center: GpsCoordinates, direction: CardinalDirection) -> GpsCoordinates {
        let (lat_step, lon_step) = direction.unit_step();
        center.offset(
            self.radar_offset * Decimal::from(lat_step),
            self.radar_offset * Decimal::from(lon_step),
        )
    }
}
