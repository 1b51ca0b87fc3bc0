pub mod geo;
pub mod query;
pub mod restaurant;

pub use geo::GeoPoint;
pub use query::{ProximityQuery, SpatialKey};
pub use restaurant::{CatalogEntry, RestaurantRecord};
