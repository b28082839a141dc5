//! Weather data models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One raw sub-daily forecast sample
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    /// Precipitation over the sample interval (mm)
    pub precipitation_mm: f64,
    pub condition: String,
}

/// Agronomic indicators for one sampled day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyWeatherRecord {
    pub date: NaiveDate,
    /// Timestamp of the sample the day was derived from
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub relative_humidity: f64,
    pub vapor_pressure_deficit: f64,
    pub wet_bulb_depression: f64,
    pub crop_evapotranspiration: f64,
    pub accumulated_thermal_units: f64,
    pub rainfall_next_24h: f64,
}

/// Cardinal direction of a radar probe
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CardinalDirection {
    North,
    South,
    East,
    West,
}

impl CardinalDirection {
    pub const ALL: [CardinalDirection; 4] = [
        CardinalDirection::North,
        CardinalDirection::South,
        CardinalDirection::East,
        CardinalDirection::West,
    ];

    /// Unit step (latitude, longitude) for this direction
    pub fn unit_step(&self) -> (i32, i32) {
        match self {
            CardinalDirection::North => (1, 0),
            CardinalDirection::South => (-1, 0),
            CardinalDirection::East => (0, 1),
            CardinalDirection::West => (0, -1),
        }
    }
}

impl std::fmt::Display for CardinalDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardinalDirection::North => write!(f, "North"),
            CardinalDirection::South => write!(f, "South"),
            CardinalDirection::East => write!(f, "East"),
            CardinalDirection::West => write!(f, "West"),
        }
    }
}

/// Current conditions reported at a single point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointConditions {
    pub temperature_celsius: f64,
    pub condition: String,
    /// Rain volume when the provider reports a rain block
    pub rain_mm: Option<f64>,
}

impl PointConditions {
    /// Raining when a rain block is present or the condition text says so
    pub fn is_raining(&self) -> bool {
        if self.rain_mm.is_some() {
            return true;
        }
        let condition = self.condition.to_lowercase();
        ["rain", "chuva", "drizzle", "garoa", "thunderstorm", "trovoada"]
            .iter()
            .any(|word| condition.contains(word))
    }
}

/// One probe of the four-point radar approximation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RadarSample {
    pub direction: CardinalDirection,
    pub temperature: f64,
    pub condition: String,
    pub is_raining: bool,
}

impl RadarSample {
    pub fn from_conditions(direction: CardinalDirection, conditions: &PointConditions) -> Self {
        Self {
            direction,
            temperature: conditions.temperature_celsius,
            condition: conditions.condition.clone(),
            is_raining: conditions.is_raining(),
        }
    }
}

/// Thermal-time progress of a variety towards maturity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThermalProgress {
    pub accumulated: f64,
    pub target: f64,
    /// 0-100, capped
    pub percent_complete: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(condition: &str, rain_mm: Option<f64>) -> PointConditions {
        PointConditions {
            temperature_celsius: 22.0,
            condition: condition.to_string(),
            rain_mm,
        }
    }

    #[test]
    fn test_rain_from_structured_field() {
        assert!(conditions("nuvens dispersas", Some(0.4)).is_raining());
    }

    #[test]
    fn test_rain_from_condition_text() {
        assert!(conditions("chuva moderada", None).is_raining());
        assert!(conditions("Light Rain", None).is_raining());
        assert!(!conditions("céu limpo", None).is_raining());
    }

    #[test]
    fn test_unit_steps_cover_all_axes() {
        let sum = CardinalDirection::ALL
            .iter()
            .map(|d| d.unit_step())
            .fold((0, 0), |acc, s| (acc.0 + s.0, acc.1 + s.1));
        assert_eq!(sum, (0, 0));
    }
}
