//! QEats Core - Domain models, errors, clock, and configuration
//!
//! This crate contains the domain types shared by every other QEats crate:
//! restaurant records, proximity queries, spatial keys, and the layered
//! configuration for the lookup engine.

pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod models;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{QeatsError, Result};
