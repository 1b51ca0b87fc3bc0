use async_trait::async_trait;
use qeats_core::error::Result;
use qeats_core::models::{RestaurantRecord, SpatialKey};
use std::time::Duration;

/// Port for the restaurant catalog
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Return every restaurant in the catalog, unfiltered.
    ///
    /// May be slow. Fails with `CatalogUnavailable` when the catalog cannot
    /// be reached.
    async fn list_all(&self) -> Result<Vec<RestaurantRecord>>;
}

/// Port for the key-value store backing the proximity cache
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get the raw bytes stored under a key, if any
    async fn get(&self, key: &SpatialKey) -> Result<Option<Vec<u8>>>;

    /// Store bytes under a key, replacing any previous value.
    /// The value disappears once `ttl` has elapsed.
    async fn set_with_expiry(&self, key: &SpatialKey, value: Vec<u8>, ttl: Duration)
        -> Result<()>;

    /// Remove a key
    async fn delete(&self, key: &SpatialKey) -> Result<()>;
}
