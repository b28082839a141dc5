//! Field cockpit indicator bands for the current day

use serde::{Deserialize, Serialize};

use crate::models::{DailyWeatherRecord, RiskStatus};

/// Air temperature band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TemperatureBand {
    /// Below 18°C
    Low,
    /// 18-30°C
    Ideal,
    /// Above 30°C
    HeatStress,
}

impl TemperatureBand {
    pub fn from_celsius(temperature: f64) -> Self {
        if temperature < 18.0 {
            TemperatureBand::Low
        } else if temperature <= 30.0 {
            TemperatureBand::Ideal
        } else {
            TemperatureBand::HeatStress
        }
    }
}

/// Relative humidity band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HumidityBand {
    /// Below 30%
    CriticalDry,
    /// 30-50%
    Attention,
    /// Above 50%
    Ideal,
}

impl HumidityBand {
    pub fn from_percent(humidity: f64) -> Self {
        if humidity < 30.0 {
            HumidityBand::CriticalDry
        } else if humidity <= 50.0 {
            HumidityBand::Attention
        } else {
            HumidityBand::Ideal
        }
    }
}

/// Application band of the wet-bulb depression gauge
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeltaTBand {
    StopDrift,
    Fit,
    AttentionEvaporation,
    StopDropletLoss,
}

impl DeltaTBand {
    pub fn from_delta_t(delta_t: f64) -> Self {
        if delta_t < 2.0 {
            DeltaTBand::StopDrift
        } else if delta_t <= 8.0 {
            DeltaTBand::Fit
        } else if delta_t <= 10.0 {
            DeltaTBand::AttentionEvaporation
        } else {
            DeltaTBand::StopDropletLoss
        }
    }

    pub fn status(&self) -> RiskStatus {
        match self {
            DeltaTBand::StopDrift | DeltaTBand::StopDropletLoss => RiskStatus::Stop,
            DeltaTBand::Fit => RiskStatus::Fit,
            DeltaTBand::AttentionEvaporation => RiskStatus::Caution,
        }
    }
}

/// Gauges shown for the current record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CockpitIndicators {
    pub temperature: f64,
    pub temperature_band: TemperatureBand,
    pub humidity: f64,
    pub humidity_band: HumidityBand,
    pub wet_bulb_depression: f64,
    pub delta_t_band: DeltaTBand,
    /// Water demand (mm/day)
    pub crop_evapotranspiration: f64,
}

impl From<&DailyWeatherRecord> for CockpitIndicators {
    fn from(record: &DailyWeatherRecord) -> Self {
        Self {
            temperature: record.temperature,
            temperature_band: TemperatureBand::from_celsius(record.temperature),
            humidity: record.relative_humidity,
            humidity_band: HumidityBand::from_percent(record.relative_humidity),
            wet_bulb_depression: record.wet_bulb_depression,
            delta_t_band: DeltaTBand::from_delta_t(record.wet_bulb_depression),
            crop_evapotranspiration: record.crop_evapotranspiration,
        }
    }
}
