use qeats_core::models::{RestaurantRecord, SpatialKey};
use serde::{Deserialize, Serialize};

/// Where a lookup result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookupSource {
    /// Served from a fresh cache entry
    Cache,
    /// Recomputed from the catalog
    Catalog,
}

/// Lookup result with details about how it was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupOutcome {
    /// Spatial key of the query point
    pub key: SpatialKey,

    /// Open restaurants inside the serving radius, in catalog order
    pub records: Vec<RestaurantRecord>,

    /// Whether the records came from the cache or the catalog
    pub source: LookupSource,

    /// Catalog records skipped because their hours could not be parsed.
    /// Always zero for cache hits.
    pub skipped_records: usize,
}

impl LookupOutcome {
    pub fn is_cache_hit(&self) -> bool {
        self.source == LookupSource::Cache
    }
}
