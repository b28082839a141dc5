//! Input validation for agronomic requests

use rust_decimal::Decimal;

use crate::models::Crop;
use crate::types::GpsCoordinates;

// ============================================================================
// Weather Inputs
// ============================================================================

/// Validate air temperature is a finite, physically plausible reading
pub fn validate_temperature(temperature: f64) -> Result<(), &'static str> {
    if !temperature.is_finite() {
        return Err("Temperature must be a finite number");
    }
    if !(-60.0..=60.0).contains(&temperature) {
        return Err("Temperature must be between -60 and 60 °C");
    }
    Ok(())
}

/// Validate relative humidity is a percentage
pub fn validate_humidity(humidity: f64) -> Result<(), &'static str> {
    if !humidity.is_finite() || !(0.0..=100.0).contains(&humidity) {
        return Err("Relative humidity must be between 0 and 100%");
    }
    Ok(())
}

/// Validate wet-bulb depression (Delta T) reading.
///
/// Delta T is signed: near saturation the wet-bulb fit lands slightly below zero.
pub fn validate_wet_bulb_depression(delta_t: f64) -> Result<(), &'static str> {
    if !delta_t.is_finite() {
        return Err("Delta T must be a finite number");
    }
    Ok(())
}

/// Validate crop coefficient (kc) is in the agronomic range
pub fn validate_crop_coefficient(kc: f64) -> Result<(), &'static str> {
    if !kc.is_finite() || kc <= 0.0 || kc > 2.0 {
        return Err("Crop coefficient must be greater than 0 and at most 2");
    }
    Ok(())
}

pub fn validate_base_temperature(base_temperature: f64) -> Result<(), &'static str> {
    if !base_temperature.is_finite() || !(0.0..=40.0).contains(&base_temperature) {
        return Err("Base temperature must be between 0 and 40 °C");
    }
    Ok(())
}

// ============================================================================
// Location
// ============================================================================

/// Validate latitude/longitude ranges
pub fn validate_coordinates(coordinates: &GpsCoordinates) -> Result<(), &'static str> {
    if coordinates.latitude < Decimal::from(-90) || coordinates.latitude > Decimal::from(90) {
        return Err("Latitude must be between -90 and 90");
    }
    if coordinates.longitude < Decimal::from(-180) || coordinates.longitude > Decimal::from(180) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate a free-text location query for geocoding
pub fn validate_location_query(query: &str) -> Result<(), &'static str> {
    let query = query.trim();
    if query.is_empty() {
        return Err("Location query is required");
    }
    if query.chars().count() > 200 {
        return Err("Location query is too long");
    }
    Ok(())
}

// ============================================================================
// Catalog
// ============================================================================

/// Validate the structural invariants of a typed crop
pub fn validate_crop(crop: &Crop) -> Result<(), &'static str> {
    if crop.name.trim().is_empty() {
        return Err("Crop name is required");
    }
    validate_base_temperature(crop.base_temperature)?;
    if crop.varieties.is_empty() {
        return Err("Crop must have at least one variety");
    }
    if crop.phases.is_empty() {
        return Err("Crop must have at least one phase");
    }
    for variety in &crop.varieties {
        validate_crop_coefficient(variety.crop_coefficient)?;
        if !variety.thermal_unit_target.is_finite() || variety.thermal_unit_target < 0.0 {
            return Err("Thermal unit target cannot be negative");
        }
    }
    Ok(())
}
