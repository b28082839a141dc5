//! WebAssembly module for the agronomic decision engine
//!
//! Provides offline, client-side evaluation of:
//! - Spray-window physics (VPD, Delta T, ETc, degree-days)
//! - Spray-window risk classification
//! - Field cockpit indicator bands

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::physics;
pub use shared::types::*;

/// Vapor pressure deficit (kPa)
#[wasm_bindgen]
pub fn vapor_pressure_deficit(temperature: f64, humidity: f64) -> f64 {
    physics::vapor_pressure_deficit(temperature, humidity)
}

/// Wet-bulb depression (Delta T, °C)
#[wasm_bindgen]
pub fn wet_bulb_depression(temperature: f64, humidity: f64) -> f64 {
    physics::wet_bulb_depression(temperature, humidity)
}

/// Crop evapotranspiration (mm/day)
#[wasm_bindgen]
pub fn crop_evapotranspiration(temperature: f64, crop_coefficient: f64) -> f64 {
    physics::crop_evapotranspiration(temperature, crop_coefficient)
}

/// Degree-days above the crop's base temperature
#[wasm_bindgen]
pub fn accumulated_thermal_units(daily_average: f64, base_temperature: f64) -> f64 {
    physics::accumulated_thermal_units(daily_average, base_temperature)
}

/// Categorize a product-type label (e.g. "Químico Sistêmico")
#[wasm_bindgen]
pub fn parse_product_type(label: &str) -> String {
    ActionType::from_label(label).to_string()
}

/// Classify a spray window; returns the verdict as JSON
#[wasm_bindgen]
pub fn classify_spray_window(
    temperature: f64,
    humidity: f64,
    wet_bulb_depression: f64,
    product_label: &str,
) -> Result<String, JsValue> {
    verdict_json(temperature, humidity, wet_bulb_depression, product_label)
        .map_err(|e| JsValue::from_str(&e))
}

/// Classify a spray window from raw readings, deriving Delta T
#[wasm_bindgen]
pub fn classify_from_readings(
    temperature: f64,
    humidity: f64,
    product_label: &str,
) -> Result<String, JsValue> {
    let delta_t = physics::wet_bulb_depression(temperature, humidity);
    verdict_json(temperature, humidity, delta_t, product_label).map_err(|e| JsValue::from_str(&e))
}

/// Cockpit bands for a daily record given as JSON
#[wasm_bindgen]
pub fn cockpit_indicators(record_json: &str) -> Result<String, JsValue> {
    indicators_json(record_json).map_err(|e| JsValue::from_str(&e))
}

fn verdict_json(
    temperature: f64,
    humidity: f64,
    wet_bulb_depression: f64,
    product_label: &str,
) -> Result<String, String> {
    shared::validate_temperature(temperature)?;
    shared::validate_humidity(humidity)?;
    shared::validate_wet_bulb_depression(wet_bulb_depression)?;

    let verdict = classify(
        temperature,
        humidity,
        wet_bulb_depression,
        ActionType::from_label(product_label),
    );
    serde_json::to_string(&verdict).map_err(|e| format!("Failed to encode verdict: {}", e))
}

fn indicators_json(record_json: &str) -> Result<String, String> {
    let record: DailyWeatherRecord = serde_json::from_str(record_json)
        .map_err(|e| format!("Invalid record JSON: {}", e))?;
    serde_json::to_string(&CockpitIndicators::from(&record))
        .map_err(|e| format!("Failed to encode indicators: {}", e))
}
