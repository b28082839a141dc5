//! Weather service integration tests
//!
//! Tests for:
//! - Daily records from a provider series
//! - "No data" kept apart from "no rain"
//! - Radar fan-out with timeouts and failures

mod common;

use agro_decision_backend::services::WeatherService;
use common::{center, dec, series, MockProvider};
use proptest::prelude::*;
use shared::models::CardinalDirection;
use shared::types::DataOutcome;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn service(provider: MockProvider) -> WeatherService {
    WeatherService::with_radar_settings(Arc::new(provider), dec("0.15"), Duration::from_millis(200))
}

// ============================================================================
// Daily Records
// ============================================================================

#[tokio::test]
async fn test_full_series_gives_five_daily_records() {
    let weather = service(MockProvider::healthy());
    let records = weather.daily_records(center(), 1.15, 10.0).await;

    let records = records.items();
    assert_eq!(records.len(), 5);
    // 8 samples of 0.5 mm in each window
    assert!(records.iter().all(|r| r.rainfall_next_24h == 4.0));
    assert!(records.iter().all(|r| r.accumulated_thermal_units == 24.0));
}

#[tokio::test]
async fn test_short_series_gives_partial_records() {
    let provider = MockProvider {
        samples: Some(series(10, 25.0, 60.0)),
        ..MockProvider::healthy()
    };
    let records = service(provider).daily_records(center(), 1.0, 10.0).await;
    assert_eq!(records.items().len(), 2);
    assert_eq!(records.items()[1].rainfall_next_24h, 1.0);
}

#[tokio::test]
async fn test_provider_failure_is_unavailable_not_dry() {
    let provider = MockProvider {
        samples: None,
        ..MockProvider::healthy()
    };
    let records = service(provider).daily_records(center(), 1.0, 10.0).await;
    assert!(matches!(records, DataOutcome::Unavailable { .. }));
    assert!(records.items().is_empty());
}

#[tokio::test]
async fn test_empty_series_is_empty() {
    let provider = MockProvider {
        samples: Some(Vec::new()),
        ..MockProvider::healthy()
    };
    let records = service(provider).daily_records(center(), 1.0, 10.0).await;
    assert_eq!(records, DataOutcome::Empty);
}

// ============================================================================
// Geocoding
// ============================================================================

#[tokio::test]
async fn test_locate_outcomes() {
    let weather = service(MockProvider::healthy());
    assert!(weather.locate("Sorriso").await.is_available());
    assert_eq!(weather.locate("Atlantis").await, DataOutcome::Empty);
    assert!(matches!(
        weather.locate("offline").await,
        DataOutcome::Unavailable { .. }
    ));
}

// ============================================================================
// Radar
// ============================================================================

#[tokio::test]
async fn test_radar_order_and_rain_flag() {
    let samples = service(MockProvider::healthy()).radar(center()).await;
    let directions: Vec<CardinalDirection> = samples.iter().map(|s| s.direction).collect();
    assert_eq!(directions, CardinalDirection::ALL.to_vec());
    assert!(samples[0].is_raining);
    assert!(samples[1..].iter().all(|s| !s.is_raining));
}

#[tokio::test]
async fn test_radar_south_timeout_leaves_three_samples() {
    let provider = MockProvider {
        slow: vec![CardinalDirection::South],
        ..MockProvider::healthy()
    };
    let started = Instant::now();
    let samples = service(provider).radar(center()).await;

    assert_eq!(samples.len(), 3);
    let directions: Vec<CardinalDirection> = samples.iter().map(|s| s.direction).collect();
    assert_eq!(
        directions,
        vec![
            CardinalDirection::North,
            CardinalDirection::East,
            CardinalDirection::West
        ]
    );
    // The slow probe is cut off at the timeout, not awaited
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_radar_failed_probes_are_skipped() {
    let provider = MockProvider {
        failing: vec![CardinalDirection::East, CardinalDirection::West],
        ..MockProvider::healthy()
    };
    let samples = service(provider).radar(center()).await;
    assert_eq!(samples.len(), 2);
    assert_eq!(samples[1].direction, CardinalDirection::South);
}

#[tokio::test]
async fn test_radar_all_probes_down_is_empty() {
    let provider = MockProvider {
        failing: CardinalDirection::ALL.to_vec(),
        ..MockProvider::healthy()
    };
    assert!(service(provider).radar(center()).await.is_empty());
}

// ============================================================================
// Property-Based Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Never more than five records, never more than one per started day
    #[test]
    fn prop_record_count(count in 0usize..64) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let provider = MockProvider {
            samples: Some(series(count, 22.0, 55.0)),
            ..MockProvider::healthy()
        };
        let records = runtime.block_on(service(provider).daily_records(center(), 1.0, 10.0));
        let expected = ((count + 7) / 8).min(5);
        prop_assert_eq!(records.items().len(), expected);
    }
}
