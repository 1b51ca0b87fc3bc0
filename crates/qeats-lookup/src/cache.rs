//! Proximity result cache.
//!
//! Result sets are stored whole under their spatial key as a JSON
//! [`CacheEntry`]. Expiry is checked against the clock on every read, on top
//! of whatever expiry the backing store applies, so a read never returns a
//! set older than its TTL.
//!
//! The cache is an optimization only. A failing or unreachable backing store
//! turns reads into misses and writes into no-ops; it never fails a lookup.

use chrono::{DateTime, Utc};
use qeats_core::clock::{Clock, SystemClock};
use qeats_core::models::{RestaurantRecord, SpatialKey};
use qeats_store::ports::CacheStore;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A cached result set and the metadata needed to judge its freshness
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: SpatialKey,
    pub records: Vec<RestaurantRecord>,
    pub stored_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl CacheEntry {
    /// Whether `ttl` has fully elapsed since `stored_at`.
    ///
    /// An entry stamped in the future (clock skew) counts as fresh.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match (now - self.stored_at).to_std() {
            Ok(age) => age >= self.ttl,
            Err(_) => false,
        }
    }
}

/// Statistics about cache usage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads answered from a fresh entry
    pub hits: u64,
    /// Reads that found nothing usable
    pub misses: u64,
    /// Misses caused by an expired entry
    pub expired: u64,
    /// Backing store failures and undecodable entries
    pub errors: u64,
    /// Successful writes
    pub writes: u64,
}

impl CacheStats {
    /// Fraction of reads served from cache, 0.0 when nothing was read
    pub fn hit_rate(&self) -> f64 {
        let reads = self.hits + self.misses;
        if reads == 0 {
            0.0
        } else {
            self.hits as f64 / reads as f64
        }
    }
}

#[derive(Debug, Default)]
struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
    errors: AtomicU64,
    writes: AtomicU64,
}

impl CacheCounters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
        }
    }
}

/// Cache of proximity result sets keyed by spatial cell
pub struct ProximityCache {
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    counters: CacheCounters,
}

impl ProximityCache {
    /// Create a cache over `store` using the system clock
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            counters: CacheCounters::default(),
        }
    }

    /// Replace the clock used for TTL checks
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Fresh result set stored under `key`, if any
    pub async fn get(&self, key: &SpatialKey) -> Option<Vec<RestaurantRecord>> {
        let bytes = match self.store.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                CacheCounters::bump(&self.counters.misses);
                tracing::debug!(key = %key, "Proximity cache miss");
                return None;
            }
            Err(e) => {
                CacheCounters::bump(&self.counters.errors);
                CacheCounters::bump(&self.counters.misses);
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(e) => {
                CacheCounters::bump(&self.counters.errors);
                CacheCounters::bump(&self.counters.misses);
                tracing::warn!(key = %key, error = %e, "Undecodable cache entry, treating as miss");
                return None;
            }
        };

        if entry.key != *key {
            CacheCounters::bump(&self.counters.errors);
            CacheCounters::bump(&self.counters.misses);
            tracing::warn!(key = %key, stored_key = %entry.key, "Cache entry stored under wrong key");
            return None;
        }

        if entry.is_expired(self.clock.now()) {
            CacheCounters::bump(&self.counters.expired);
            CacheCounters::bump(&self.counters.misses);
            tracing::debug!(key = %key, stored_at = %entry.stored_at, "Proximity cache entry expired");
            return None;
        }

        CacheCounters::bump(&self.counters.hits);
        tracing::debug!(key = %key, count = entry.records.len(), "Proximity cache hit");
        Some(entry.records)
    }

    /// Store `records` under `key`, replacing any previous entry and
    /// restarting its TTL
    pub async fn put(&self, key: &SpatialKey, records: &[RestaurantRecord], ttl: Duration) {
        let entry = CacheEntry {
            key: key.clone(),
            records: records.to_vec(),
            stored_at: self.clock.now(),
            ttl,
        };

        let bytes = match serde_json::to_vec(&entry) {
            Ok(bytes) => bytes,
            Err(e) => {
                CacheCounters::bump(&self.counters.errors);
                tracing::warn!(key = %key, error = %e, "Failed to encode cache entry, skipping write");
                return;
            }
        };

        match self.store.set_with_expiry(key, bytes, ttl).await {
            Ok(()) => {
                CacheCounters::bump(&self.counters.writes);
                tracing::debug!(
                    key = %key,
                    count = records.len(),
                    ttl_secs = ttl.as_secs(),
                    "Stored proximity result set"
                );
            }
            Err(e) => {
                CacheCounters::bump(&self.counters.errors);
                tracing::warn!(key = %key, error = %e, "Cache write failed, result not cached");
            }
        }
    }

    /// Remove the entry under `key`
    pub async fn evict(&self, key: &SpatialKey) {
        if let Err(e) = self.store.delete(key).await {
            CacheCounters::bump(&self.counters.errors);
            tracing::warn!(key = %key, error = %e, "Cache eviction failed");
        }
    }

    /// Snapshot of the usage counters
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot()
    }
}
