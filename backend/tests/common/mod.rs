//! In-process weather provider and catalog fixtures for integration tests

#![allow(dead_code)]

use agro_decision_backend::error::{AppError, AppResult};
use agro_decision_backend::external::weather::{GeocodedPlace, WeatherProvider};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use shared::models::{CardinalDirection, ForecastSample, PointConditions};
use shared::types::GpsCoordinates;
use std::str::FromStr;
use std::time::Duration;

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// Sorriso, MT
pub fn center() -> GpsCoordinates {
    GpsCoordinates::new(dec("-12.5425"), dec("-55.7211"))
}

/// Deterministic weather provider
pub struct MockProvider {
    pub center: GpsCoordinates,
    /// `None` makes the forecast call fail
    pub samples: Option<Vec<ForecastSample>>,
    pub slow: Vec<CardinalDirection>,
    pub failing: Vec<CardinalDirection>,
    pub raining: Vec<CardinalDirection>,
}

impl MockProvider {
    pub fn healthy() -> Self {
        Self {
            center: center(),
            samples: Some(series(40, 34.0, 40.0)),
            slow: Vec::new(),
            failing: Vec::new(),
            raining: vec![CardinalDirection::North],
        }
    }

    fn direction_of(&self, point: GpsCoordinates) -> CardinalDirection {
        if point.latitude > self.center.latitude {
            CardinalDirection::North
        } else if point.latitude < self.center.latitude {
            CardinalDirection::South
        } else if point.longitude > self.center.longitude {
            CardinalDirection::East
        } else {
            CardinalDirection::West
        }
    }
}

#[async_trait]
impl WeatherProvider for MockProvider {
    async fn geocode(&self, query: &str) -> AppResult<Option<GeocodedPlace>> {
        match query {
            "Sorriso" => Ok(Some(GeocodedPlace {
                name: "Sorriso".to_string(),
                state: Some("Mato Grosso".to_string()),
                country: Some("BR".to_string()),
                coordinates: self.center,
            })),
            "offline" => Err(AppError::WeatherServiceUnavailable),
            _ => Ok(None),
        }
    }

    async fn forecast_series(&self, _location: GpsCoordinates) -> AppResult<Vec<ForecastSample>> {
        self.samples
            .clone()
            .ok_or_else(|| AppError::WeatherProvider("503 Service Unavailable".to_string()))
    }

    async fn point_conditions(&self, location: GpsCoordinates) -> AppResult<PointConditions> {
        let direction = self.direction_of(location);
        if self.slow.contains(&direction) {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        if self.failing.contains(&direction) {
            return Err(AppError::WeatherProvider("429 Too Many Requests".to_string()));
        }
        let raining = self.raining.contains(&direction);
        Ok(PointConditions {
            temperature_celsius: 27.0,
            condition: if raining { "chuva leve" } else { "céu limpo" }.to_string(),
            rain_mm: raining.then_some(0.6),
        })
    }
}

/// 3-hourly series with constant temperature and humidity and 0.5 mm per sample
pub fn series(count: usize, temperature: f64, humidity: f64) -> Vec<ForecastSample> {
    let start = Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap();
    (0..count)
        .map(|i| ForecastSample {
            timestamp: start + ChronoDuration::hours(3 * i as i64),
            temperature_celsius: temperature,
            humidity_percent: humidity,
            precipitation_mm: 0.5,
            condition: "nuvens dispersas".to_string(),
        })
        .collect()
}

pub fn soy_biology() -> Value {
    json!({
        "Soja (Glycine max)": {
            "t_base": 10,
            "vars": {
                "Brasmax": {"kc": 1.15, "gda_meta": 1350, "info": "Alto teto produtivo."},
                "TMG": {"kc": 1.1, "gda_meta": 1400, "info": "Resistente a nematoides."}
            },
            "fases": {
                "V3 - Terceiro Trifólio": {
                    "desc": "Três nós abertos.",
                    "fisiologia": "Definição de nós produtivos.",
                    "manejo": "Monitoramento de lagartas."
                },
                "R1 - Início Floração": {
                    "desc": "Início do florescimento.",
                    "fisiologia": "Mudança hormonal.",
                    "manejo": "Entrada de fungicidas."
                }
            }
        }
    })
}

pub fn soy_protocols() -> Value {
    json!({
        "Soja (Glycine max)": {
            "fases": {
                "R1 - Início Floração": {
                    "quimica": [
                        {
                            "Alvo": "Ferrugem Asiática",
                            "Ativo": "Protioconazol + Trifloxistrobina",
                            "Grupo": "FRAC 3 + 11",
                            "Tipo": "Químico Sistêmico",
                            "Estrategia": "Base do programa preventivo."
                        }
                    ]
                }
            }
        }
    })
}
