//! QEats Geo - Spatial keys, distances, and open-hours checks
//!
//! This crate holds the pure building blocks of a proximity lookup: the
//! geohash cell encoder used for cache keys, great-circle distance, the
//! open-hours filter, and query validation.

pub mod distance;
pub mod geohash;
pub mod hours;
pub mod validation;

pub use distance::{distance_km, within_radius};
pub use self::geohash::{CellBounds, GeoKeyEncoder, GeohashEncoder};
pub use hours::{is_open, parse_time_of_day, OpenHours};
pub use validation::{validate_point, validate_query};
