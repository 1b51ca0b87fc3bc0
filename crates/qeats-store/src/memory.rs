//! In-memory catalog and cache store for development and testing.
//!
//! These implementations use `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use qeats_core::clock::{Clock, SystemClock};
use qeats_core::error::{QeatsError, Result};
use qeats_core::models::{CatalogEntry, RestaurantRecord, SpatialKey};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::ports::{CacheStore, CatalogProvider};

/// In-memory implementation of CatalogProvider.
///
/// Counts `list_all` calls and can be switched to an unavailable state, so
/// tests can observe whether a lookup reached the catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    records: Arc<RwLock<Vec<RestaurantRecord>>>,
    list_calls: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding `records`, in order
    pub fn with_records(records: Vec<RestaurantRecord>) -> Self {
        let catalog = Self::new();
        *catalog.records.write().unwrap() = records;
        catalog
    }

    /// Create a catalog from storage documents
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self::with_records(entries.into_iter().map(RestaurantRecord::from).collect())
    }

    /// Create a catalog from a JSON array of storage documents
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)
            .map_err(|e| QeatsError::Serialization(format!("Invalid catalog JSON: {}", e)))?;
        Ok(Self::from_entries(entries))
    }

    /// Append a record
    pub fn insert(&self, record: RestaurantRecord) {
        self.records.write().unwrap().push(record);
    }

    /// Simulate the catalog going down or coming back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `list_all` calls made so far, failed ones included
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CatalogProvider for MemoryCatalog {
    async fn list_all(&self) -> Result<Vec<RestaurantRecord>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(QeatsError::CatalogUnavailable {
                reason: "in-memory catalog marked unavailable".to_string(),
            });
        }

        let records = self.records.read().unwrap();
        Ok(records.clone())
    }
}

/// Bytes stored under a key with their expiry instant
#[derive(Debug, Clone)]
struct StoredValue {
    bytes: Vec<u8>,
    /// `None` when the TTL does not fit a timestamp
    expires_at: Option<DateTime<Utc>>,
}

impl StoredValue {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// In-memory implementation of CacheStore.
///
/// Expiry is lazy: an expired key is dropped by the first read that sees it,
/// and every write sweeps all expired keys, so the map stays bounded by the
/// number of cells written within one TTL.
#[derive(Clone)]
pub struct MemoryCacheStore {
    entries: Arc<RwLock<HashMap<SpatialKey, StoredValue>>>,
    clock: Arc<dyn Clock>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryCacheStore {
    /// Create an empty store on the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty store that reads time from `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Simulate the store becoming unreachable or reachable again
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of stored keys, expired ones included until swept
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired key and return how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|_, value| !value.is_expired(now));
        before - entries.len()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(QeatsError::CacheUnavailable {
                reason: "in-memory cache store marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryCacheStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCacheStore")
            .field("entries", &self.len())
            .field("unavailable", &self.unavailable.load(Ordering::SeqCst))
            .finish()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &SpatialKey) -> Result<Option<Vec<u8>>> {
        self.ensure_available()?;
        let now = self.clock.now();

        {
            let entries = self.entries.read().unwrap();
            match entries.get(key) {
                None => return Ok(None),
                Some(value) if !value.is_expired(now) => return Ok(Some(value.bytes.clone())),
                Some(_) => {}
            }
        }

        // Expired: drop it unless a writer replaced it in the meantime
        let mut entries = self.entries.write().unwrap();
        if entries.get(key).is_some_and(|value| value.is_expired(now)) {
            entries.remove(key);
            tracing::trace!(key = %key, "Dropped expired cache key");
        }
        Ok(None)
    }

    async fn set_with_expiry(
        &self,
        key: &SpatialKey,
        value: Vec<u8>,
        ttl: Duration,
    ) -> Result<()> {
        self.ensure_available()?;

        let now = self.clock.now();
        let expires_at = TimeDelta::from_std(ttl).ok().and_then(|ttl| now.checked_add_signed(ttl));

        let mut entries = self.entries.write().unwrap();
        entries.retain(|_, stored| !stored.is_expired(now));
        entries.insert(key.clone(), StoredValue { bytes: value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &SpatialKey) -> Result<()> {
        self.ensure_available()?;
        let mut entries = self.entries.write().unwrap();
        entries.remove(key);
        Ok(())
    }
}
