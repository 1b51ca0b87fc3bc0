//! Error types for QEats

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QeatsError {
    // Query errors
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    // Catalog record errors
    #[error("Restaurant {restaurant_id} has unparsable {field}: '{value}'")]
    RecordParse {
        restaurant_id: String,
        field: String,
        value: String,
    },

    // Backing store errors
    #[error("Cache unavailable: {reason}")]
    CacheUnavailable { reason: String },

    #[error("Catalog unavailable: {reason}")]
    CatalogUnavailable { reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    #[error("Config file not found at {path}")]
    ConfigFileNotFound { path: PathBuf },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QeatsError {
    /// Shorthand for an `InvalidInput` error
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error should reach the caller of a lookup.
    ///
    /// Only bad input and an unreachable catalog surface; everything else
    /// degrades to the best available result inside the lookup engine.
    pub fn is_caller_visible(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::CatalogUnavailable { .. })
    }
}

pub type Result<T> = std::result::Result<T, QeatsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_visible_errors() {
        assert!(QeatsError::invalid_input("radius_km", "must be positive").is_caller_visible());
        assert!(QeatsError::CatalogUnavailable { reason: "down".into() }.is_caller_visible());

        assert!(!QeatsError::CacheUnavailable { reason: "down".into() }.is_caller_visible());
        assert!(!QeatsError::RecordParse {
            restaurant_id: "11".into(),
            field: "opensAt".into(),
            value: "nine".into(),
        }
        .is_caller_visible());
    }

    #[test]
    fn test_record_parse_message() {
        let err = QeatsError::RecordParse {
            restaurant_id: "11".into(),
            field: "closesAt".into(),
            value: "25:00".into(),
        };
        assert_eq!(err.to_string(), "Restaurant 11 has unparsable closesAt: '25:00'");
    }
}
