//! QEats Store - Catalog and cache ports with in-memory adapters
//!
//! This crate defines the two external collaborators of the lookup engine,
//! the restaurant catalog and the key-value cache backing store, and
//! provides in-memory adapters for development and testing.

pub mod memory;
pub mod ports;

pub use memory::{MemoryCacheStore, MemoryCatalog};
pub use ports::{CacheStore, CatalogProvider};
