//! Environmental physics for spraying and irrigation decisions
//!
//! Every function is pure and total: non-finite input, or a computation that
//! ends in NaN/Infinity, yields `0.0` instead of leaking into the rule tables.

/// Fixed mean radiation term (MJ m⁻² day⁻¹) for tropical latitudes
pub const TROPICAL_RADIATION: f64 = 23.0;

/// Conversion from MJ m⁻² to mm of evaporated water
const RADIATION_TO_MM: f64 = 0.408;

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Round to a number of decimal places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Saturation vapor pressure (kPa), Tetens approximation
pub fn saturation_vapor_pressure(temp_c: f64) -> f64 {
    if !temp_c.is_finite() {
        return 0.0;
    }
    finite_or_zero(0.61078 * ((17.27 * temp_c) / (temp_c + 237.3)).exp())
}

/// Vapor pressure deficit (kPa), never negative
pub fn vapor_pressure_deficit(temp_c: f64, humidity_percent: f64) -> f64 {
    if !all_finite(&[temp_c, humidity_percent]) {
        return 0.0;
    }
    let es = saturation_vapor_pressure(temp_c);
    let ea = es * (humidity_percent / 100.0);
    finite_or_zero((es - ea).max(0.0))
}

/// Wet-bulb temperature (°C), Stull (2011) closed form
pub fn wet_bulb_temperature(temp_c: f64, humidity_percent: f64) -> f64 {
    let t = temp_c;
    let rh = humidity_percent;

    t * (0.151977 * (rh + 8.313659).sqrt()).atan() + (t + rh).atan() - (rh - 1.676331).atan()
        + 0.00391838 * rh.powf(1.5) * (0.023101 * rh).atan()
        - 4.686035
}

/// Delta T: dry-bulb minus wet-bulb temperature (°C), one decimal
pub fn wet_bulb_depression(temp_c: f64, humidity_percent: f64) -> f64 {
    if !all_finite(&[temp_c, humidity_percent]) {
        return 0.0;
    }
    let tw = wet_bulb_temperature(temp_c, humidity_percent);
    finite_or_zero(round_to(temp_c - tw, 1))
}

/// Reference evapotranspiration (mm/day), Hargreaves-Samani adapted to a
/// fixed tropical radiation term; no latitude or day-length input.
pub fn reference_evapotranspiration(temp_c: f64) -> f64 {
    if !temp_c.is_finite() {
        return 0.0;
    }
    finite_or_zero(0.0023 * (temp_c + 17.8) * temp_c.sqrt() * RADIATION_TO_MM * TROPICAL_RADIATION)
}

/// Crop evapotranspiration (mm/day), two decimals
pub fn crop_evapotranspiration(temp_c: f64, kc: f64) -> f64 {
    if !all_finite(&[temp_c, kc]) {
        return 0.0;
    }
    finite_or_zero(round_to(reference_evapotranspiration(temp_c) * kc, 2))
}

/// Degree-days above the crop base temperature for one day
pub fn accumulated_thermal_units(daily_avg_temp: f64, base_temp: f64) -> f64 {
    if !all_finite(&[daily_avg_temp, base_temp]) {
        return 0.0;
    }
    (daily_avg_temp - base_temp).max(0.0)
}
