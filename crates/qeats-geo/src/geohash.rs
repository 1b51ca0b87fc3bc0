//! Geohash cell keys.
//!
//! Keys are standard base32 geohashes computed by the georust `geohash`
//! crate. Truncating to a fixed number of characters yields a rectangular
//! cell; every point in that cell shares the key. Points on opposite sides of
//! a cell edge get different keys however close they are.

use ::geohash::{decode_bbox, encode, Coord, GeohashError};
use qeats_core::config::{DEFAULT_GEOHASH_PRECISION, MAX_GEOHASH_PRECISION};
use qeats_core::models::{GeoPoint, SpatialKey};
use qeats_core::{QeatsError, Result};

/// Maps a point to the key of the spatial cell containing it.
///
/// Implementations must be deterministic and depend only on the point and
/// the encoder's fixed precision.
pub trait GeoKeyEncoder: Send + Sync {
    /// Encode the cell containing `point`.
    ///
    /// Fails with `InvalidInput` if the point cannot be encoded.
    fn encode(&self, point: &GeoPoint) -> Result<SpatialKey>;

    /// Key length this encoder produces
    fn precision(&self) -> usize;
}

/// Bounding box of a geohash cell.
///
/// The minimum edges belong to the cell, the maximum edges to the neighbour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl CellBounds {
    /// Center point of the cell
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new((self.min_lat + self.max_lat) / 2.0, (self.min_lon + self.max_lon) / 2.0)
    }

    pub fn contains(&self, point: &GeoPoint) -> bool {
        point.latitude >= self.min_lat
            && point.latitude < self.max_lat
            && point.longitude >= self.min_lon
            && point.longitude < self.max_lon
    }
}

/// Standard base32 geohash encoder with a fixed precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeohashEncoder {
    precision: usize,
}

impl GeohashEncoder {
    /// Create an encoder producing `precision`-character keys.
    ///
    /// Precision is clamped to `1..=12`.
    pub fn new(precision: usize) -> Self {
        Self { precision: precision.clamp(1, MAX_GEOHASH_PRECISION) }
    }

    /// Decode a key into the bounds of its cell.
    ///
    /// Fails with `InvalidInput` if the key contains a character outside the
    /// geohash alphabet.
    pub fn cell_bounds(key: &SpatialKey) -> Result<CellBounds> {
        let rect = decode_bbox(key.as_str()).map_err(|e| geohash_error("spatial_key", e))?;
        let (min, max) = (rect.min(), rect.max());

        Ok(CellBounds {
            min_lat: min.y,
            max_lat: max.y,
            min_lon: min.x,
            max_lon: max.x,
        })
    }
}

impl Default for GeohashEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_GEOHASH_PRECISION)
    }
}

impl GeoKeyEncoder for GeohashEncoder {
    fn encode(&self, point: &GeoPoint) -> Result<SpatialKey> {
        let coord = Coord { x: point.longitude, y: point.latitude };
        let hash = encode(coord, self.precision).map_err(|e| geohash_error("point", e))?;
        Ok(SpatialKey(hash))
    }

    fn precision(&self) -> usize {
        self.precision
    }
}

fn geohash_error(field: &str, error: GeohashError) -> QeatsError {
    QeatsError::invalid_input(field, error.to_string())
}
