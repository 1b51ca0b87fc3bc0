//! QEats Lookup - Proximity cache and open-restaurant lookup
//!
//! This crate implements the lookup use case: derive the spatial key of the
//! query point, serve from the proximity cache when possible, and otherwise
//! scan the catalog for open restaurants inside the serving radius and cache
//! the result.

pub mod cache;
pub mod models;
pub mod service;

pub use cache::{CacheEntry, CacheStats, ProximityCache};
pub use models::{LookupOutcome, LookupSource};
pub use service::{select_open_nearby, ProximityLookupService};
