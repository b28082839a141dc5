//! Common types used across the engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// GPS coordinates in decimal degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Shift the point by a number of degrees along each axis
    pub fn offset(&self, d_latitude: Decimal, d_longitude: Decimal) -> Self {
        Self {
            latitude: self.latitude + d_latitude,
            longitude: self.longitude + d_longitude,
        }
    }
}

/// Result of an external data lookup.
///
/// Keeps "the provider confirmed there is nothing" apart from "we could not
/// ask the provider", so a failed forecast fetch is never read as zero rain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum DataOutcome<T> {
    Available(T),
    Empty,
    Unavailable { reason: String },
}

impl<T> DataOutcome<T> {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        DataOutcome::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DataOutcome::Available(_))
    }
}

impl<T> DataOutcome<Vec<T>> {
    /// Wrap a collection, treating an empty one as `Empty`
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            DataOutcome::Empty
        } else {
            DataOutcome::Available(items)
        }
    }

    /// Items when available, an empty slice otherwise
    pub fn items(&self) -> &[T] {
        match self {
            DataOutcome::Available(items) => items,
            _ => &[],
        }
    }
}
