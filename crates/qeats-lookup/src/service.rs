use qeats_core::clock::Clock;
use qeats_core::config::LookupConfig;
use qeats_core::error::{QeatsError, Result};
use qeats_core::models::{GeoPoint, ProximityQuery, RestaurantRecord, SpatialKey};
use qeats_geo::distance::within_radius;
use qeats_geo::geohash::{GeoKeyEncoder, GeohashEncoder};
use qeats_geo::hours::is_open;
use qeats_geo::validation::{validate_point, validate_query};
use qeats_store::ports::{CacheStore, CatalogProvider};
use std::sync::Arc;

use crate::cache::ProximityCache;
use crate::models::{LookupOutcome, LookupSource};

/// Keep the candidates that are open at `query.time` and strictly inside
/// the serving radius, preserving their order.
///
/// Candidates with unparsable hours are dropped and counted; the second
/// element of the result is that count.
pub fn select_open_nearby(
    candidates: Vec<RestaurantRecord>,
    query: &ProximityQuery,
) -> (Vec<RestaurantRecord>, usize) {
    let mut skipped = 0;

    let selected: Vec<RestaurantRecord> = candidates
        .into_iter()
        .filter(|candidate| match is_open(candidate, query.time) {
            Ok(open) => open && within_radius(&query.point, &candidate.location, query.radius_km),
            Err(e) => {
                skipped += 1;
                tracing::warn!(
                    restaurant_id = %candidate.restaurant_id,
                    error = %e,
                    "Skipping catalog record with unparsable hours"
                );
                false
            }
        })
        .collect();

    (selected, skipped)
}

/// Finds open restaurants near a point, through the proximity cache.
///
/// The cache key depends on the query point only. Queries with a different
/// time or radius that land in an already cached cell get that cell's
/// cached set back unchanged, as computed for the query that populated it.
///
/// Concurrent misses on the same cell each recompute and write; the last
/// write wins. Recomputation has no side effects, so this converges.
pub struct ProximityLookupService {
    catalog: Arc<dyn CatalogProvider>,
    cache: ProximityCache,
    encoder: Arc<dyn GeoKeyEncoder>,
    config: LookupConfig,
}

impl ProximityLookupService {
    /// Create a service over the given catalog and cache store.
    ///
    /// Keys come from a geohash encoder at the configured precision and TTLs
    /// are checked against the system clock.
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        cache_store: Arc<dyn CacheStore>,
        config: LookupConfig,
    ) -> Self {
        Self {
            catalog,
            cache: ProximityCache::new(cache_store),
            encoder: Arc::new(GeohashEncoder::new(config.geohash_precision)),
            config,
        }
    }

    /// Use `clock` for cache TTL checks
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.cache = self.cache.with_clock(clock);
        self
    }

    /// Use a different spatial key encoder
    pub fn with_encoder(mut self, encoder: Arc<dyn GeoKeyEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn cache(&self) -> &ProximityCache {
        &self.cache
    }

    /// Cache key for the cell containing `point`
    pub fn spatial_key(&self, point: &GeoPoint) -> Result<SpatialKey> {
        self.encoder.encode(point)
    }

    /// Open restaurants within `query.radius_km` of `query.point`.
    ///
    /// Fails with `InvalidInput` for a bad query and `CatalogUnavailable`
    /// when a recompute cannot reach the catalog. An empty result is not an
    /// error.
    pub async fn find_open_nearby(&self, query: &ProximityQuery) -> Result<Vec<RestaurantRecord>> {
        Ok(self.find_open_nearby_detailed(query).await?.records)
    }

    /// Like [`find_open_nearby`](Self::find_open_nearby), also reporting the
    /// key, the source of the records, and how many records were skipped.
    pub async fn find_open_nearby_detailed(&self, query: &ProximityQuery) -> Result<LookupOutcome> {
        validate_query(query)?;

        let key = self.encoder.encode(&query.point)?;

        if self.config.cache_enabled {
            if let Some(records) = self.cache.get(&key).await {
                return Ok(LookupOutcome {
                    key,
                    records,
                    source: LookupSource::Cache,
                    skipped_records: 0,
                });
            }
        }

        let candidates = self.catalog.list_all().await.map_err(|e| {
            tracing::error!(key = %key, error = %e, "Catalog lookup failed");
            match e {
                QeatsError::CatalogUnavailable { .. } => e,
                other => QeatsError::CatalogUnavailable { reason: other.to_string() },
            }
        })?;
        let candidate_count = candidates.len();

        let (records, skipped_records) = select_open_nearby(candidates, query);

        tracing::debug!(
            key = %key,
            candidates = candidate_count,
            matched = records.len(),
            skipped = skipped_records,
            "Recomputed proximity result set"
        );

        if self.config.cache_enabled {
            self.cache.put(&key, &records, self.config.cache_ttl).await;
        }

        Ok(LookupOutcome {
            key,
            records,
            source: LookupSource::Catalog,
            skipped_records,
        })
    }

    /// Drop the cached result set for the cell containing `point`.
    ///
    /// Fails with `InvalidInput` if the point cannot be encoded; a failing
    /// cache store is logged and ignored.
    pub async fn invalidate(&self, point: &GeoPoint) -> Result<()> {
        validate_point(point)?;
        let key = self.encoder.encode(point)?;
        self.cache.evict(&key).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn record(id: &str, lat: f64, lon: f64, opens_at: &str, closes_at: &str) -> RestaurantRecord {
        RestaurantRecord {
            restaurant_id: id.to_string(),
            name: format!("Restaurant {}", id),
            city: "Bengaluru".to_string(),
            image_url: String::new(),
            location: GeoPoint::new(lat, lon),
            opens_at: opens_at.to_string(),
            closes_at: closes_at.to_string(),
            attributes: vec![],
        }
    }

    fn query_at(time: &str, radius_km: f64) -> ProximityQuery {
        ProximityQuery::new(
            GeoPoint::new(12.9, 77.6),
            NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap(),
            radius_km,
        )
    }

    #[test]
    fn test_select_keeps_catalog_order() {
        let candidates = vec![
            record("far-first", 12.91, 77.6, "09:00:00", "22:00:00"),
            record("near-second", 12.9, 77.6, "09:00:00", "22:00:00"),
        ];

        let (selected, skipped) = select_open_nearby(candidates, &query_at("12:00:00", 5.0));

        let ids: Vec<&str> = selected.iter().map(|r| r.restaurant_id.as_str()).collect();
        assert_eq!(ids, vec!["far-first", "near-second"]);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_select_requires_open_and_near() {
        let candidates = vec![
            record("open-near", 12.9, 77.6, "09:00:00", "22:00:00"),
            record("closed-near", 12.9, 77.6, "13:00:00", "22:00:00"),
            record("open-far", 13.5, 77.6, "09:00:00", "22:00:00"),
        ];

        let (selected, _) = select_open_nearby(candidates, &query_at("12:00:00", 5.0));

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].restaurant_id, "open-near");
    }

    #[test]
    fn test_select_skips_unparsable_records() {
        let candidates = vec![
            record("bad", 12.9, 77.6, "nine", "22:00:00"),
            record("good", 12.9, 77.6, "09:00:00", "22:00:00"),
            record("also-bad", 12.9, 77.6, "09:00:00", "25:00:00"),
        ];

        let (selected, skipped) = select_open_nearby(candidates, &query_at("12:00:00", 5.0));

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].restaurant_id, "good");
        assert_eq!(skipped, 2);
    }

    #[test]
    fn test_select_empty_catalog() {
        let (selected, skipped) = select_open_nearby(vec![], &query_at("12:00:00", 5.0));
        assert!(selected.is_empty());
        assert_eq!(skipped, 0);
    }
}
