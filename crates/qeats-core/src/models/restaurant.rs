//! Restaurant records as served to callers and as stored in the catalog.

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// Restaurant snapshot returned by lookups and stored in the proximity cache.
///
/// Records are immutable once read from the catalog. The JSON form is flat
/// (`latitude`/`longitude` sit next to the other fields) and uses camelCase
/// names, so a cached value round-trips every field exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRecord {
    pub restaurant_id: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(flatten)]
    pub location: GeoPoint,
    /// Opening time of day, ISO local time (e.g. `09:00:00`)
    pub opens_at: String,
    /// Closing time of day, ISO local time (e.g. `22:00:00`)
    pub closes_at: String,
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// Restaurant document as the catalog stores it.
///
/// Carries the storage document id alongside the restaurant fields. Use the
/// `From` conversion to obtain a [`RestaurantRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub image_url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub opens_at: String,
    pub closes_at: String,
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl From<CatalogEntry> for RestaurantRecord {
    fn from(entry: CatalogEntry) -> Self {
        // Destructured so that adding a storage field fails to compile here.
        let CatalogEntry {
            id: _,
            restaurant_id,
            name,
            city,
            image_url,
            latitude,
            longitude,
            opens_at,
            closes_at,
            attributes,
        } = entry;

        Self {
            restaurant_id,
            name,
            city,
            image_url,
            location: GeoPoint { latitude, longitude },
            opens_at,
            closes_at,
            attributes,
        }
    }
}
