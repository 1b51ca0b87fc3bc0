use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::GeoPoint;

/// Proximity lookup request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProximityQuery {
    /// Point to search around
    pub point: GeoPoint,

    /// Time of day used for the open-hours check
    pub time: NaiveTime,

    /// Serving radius in kilometers, must be positive
    pub radius_km: f64,
}

impl ProximityQuery {
    pub fn new(point: GeoPoint, time: NaiveTime, radius_km: f64) -> Self {
        Self { point, time, radius_km }
    }
}

/// Cache key for a spatial cell.
///
/// Opaque, fixed length for a given encoder precision. Two points in the
/// same cell always map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpatialKey(pub String);

impl SpatialKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SpatialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SpatialKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
