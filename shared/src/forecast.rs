//! Daily agronomic records from a sub-daily forecast series
//!
//! The series is sampled once per day at a fixed stride instead of being
//! averaged: index `i`, `i + 8`, `i + 16`, ... of a 3-hourly series. Rain is
//! the exception, summed over the 24 hours that start at the sampled point.

use crate::models::{DailyWeatherRecord, ForecastSample, ThermalProgress};
use crate::physics;

/// 3-hourly samples in one day
pub const SAMPLES_PER_DAY: usize = 8;

/// Days covered by the provider's short-range series
pub const MAX_FORECAST_DAYS: usize = 5;

/// Build one record per sampled day.
///
/// A series shorter than five days yields fewer records; an empty series
/// yields none.
pub fn aggregate_daily(
    samples: &[ForecastSample],
    crop_coefficient: f64,
    base_temperature: f64,
) -> Vec<DailyWeatherRecord> {
    (0..samples.len())
        .step_by(SAMPLES_PER_DAY)
        .take(MAX_FORECAST_DAYS)
        .map(|i| {
            let sample = &samples[i];
            let window_end = (i + SAMPLES_PER_DAY).min(samples.len());
            daily_record(
                sample,
                &samples[i..window_end],
                crop_coefficient,
                base_temperature,
            )
        })
        .collect()
}

fn daily_record(
    sample: &ForecastSample,
    next_24h: &[ForecastSample],
    crop_coefficient: f64,
    base_temperature: f64,
) -> DailyWeatherRecord {
    let temperature = sample.temperature_celsius;
    let humidity = sample.humidity_percent;

    DailyWeatherRecord {
        date: sample.timestamp.date_naive(),
        timestamp: sample.timestamp,
        temperature,
        relative_humidity: humidity,
        vapor_pressure_deficit: physics::round_to(
            physics::vapor_pressure_deficit(temperature, humidity),
            2,
        ),
        wet_bulb_depression: physics::wet_bulb_depression(temperature, humidity),
        crop_evapotranspiration: physics::crop_evapotranspiration(temperature, crop_coefficient),
        accumulated_thermal_units: physics::accumulated_thermal_units(temperature, base_temperature),
        rainfall_next_24h: rolling_rainfall(next_24h),
    }
}

/// Sum of precipitation over a window, one decimal, never negative
pub fn rolling_rainfall(window: &[ForecastSample]) -> f64 {
    let total: f64 = window
        .iter()
        .map(|s| s.precipitation_mm)
        .filter(|mm| mm.is_finite() && *mm > 0.0)
        .sum();
    physics::round_to(total, 1)
}

/// Cumulative thermal units over the records against a maturity target
pub fn thermal_progress(records: &[DailyWeatherRecord], target: f64) -> ThermalProgress {
    let accumulated: f64 = records.iter().map(|r| r.accumulated_thermal_units).sum();
    let percent_complete = if target > 0.0 {
        (accumulated / target * 100.0).min(100.0)
    } else {
        0.0
    };

    ThermalProgress {
        accumulated: physics::round_to(accumulated, 1),
        target,
        percent_complete: physics::round_to(percent_complete, 1),
    }
}
