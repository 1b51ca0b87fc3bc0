use crate::error::{QeatsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Default lifetime of a cached proximity result
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Default geohash length used for cache keys
pub const DEFAULT_GEOHASH_PRECISION: usize = 7;

/// Longest geohash the key encoder supports
pub const MAX_GEOHASH_PRECISION: usize = 12;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Resolved settings handed to the lookup service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupConfig {
    /// When false every lookup recomputes from the catalog
    pub cache_enabled: bool,
    /// Lifetime of a cached result set
    pub cache_ttl: Duration,
    /// Geohash length used for cache keys
    pub geohash_precision: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            geohash_precision: DEFAULT_GEOHASH_PRECISION,
        }
    }
}

/// Layered configuration for the lookup engine
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub cache_enabled: ConfigValue<bool>,
    pub cache_ttl_secs: ConfigValue<u64>,
    pub geohash_precision: ConfigValue<usize>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            cache_enabled: ConfigValue::new(true, ConfigSource::Default),
            cache_ttl_secs: ConfigValue::new(DEFAULT_CACHE_TTL_SECS, ConfigSource::Default),
            geohash_precision: ConfigValue::new(DEFAULT_GEOHASH_PRECISION, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(QeatsError::ConfigFileNotFound { path: path.to_path_buf() });
        }

        let content = fs::read_to_string(path).map_err(|e| QeatsError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("Failed to read config file: {}", e),
        })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| QeatsError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(enabled) = file_config.cache_enabled {
            self.cache_enabled.update(enabled, ConfigSource::File);
        }

        if let Some(ttl) = file_config.cache_ttl_secs {
            self.cache_ttl_secs.update(validate_ttl_secs(ttl)?, ConfigSource::File);
        }

        if let Some(precision) = file_config.geohash_precision {
            self.geohash_precision.update(validate_precision(precision)?, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // QEATS_CACHE_ENABLED
        if let Ok(enabled_str) = env::var("QEATS_CACHE_ENABLED") {
            match parse_bool(&enabled_str) {
                Ok(enabled) => self.cache_enabled.update(enabled, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid QEATS_CACHE_ENABLED value '{}': expected true or false",
                    enabled_str
                ),
            }
        }

        // QEATS_CACHE_TTL_SECS
        if let Ok(ttl_str) = env::var("QEATS_CACHE_TTL_SECS") {
            match parse_ttl_secs(&ttl_str) {
                Ok(ttl) => self.cache_ttl_secs.update(ttl, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid QEATS_CACHE_TTL_SECS value '{}': expected a positive number of seconds",
                    ttl_str
                ),
            }
        }

        // QEATS_GEOHASH_PRECISION
        if let Ok(precision_str) = env::var("QEATS_GEOHASH_PRECISION") {
            match parse_precision(&precision_str) {
                Ok(precision) => {
                    self.geohash_precision.update(precision, ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid QEATS_GEOHASH_PRECISION value '{}': expected 1 to {}",
                    precision_str,
                    MAX_GEOHASH_PRECISION
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments.
    ///
    /// Values are checked like file values. Nothing is applied if any
    /// override is invalid.
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) -> Result<()> {
        let ttl = overrides.cache_ttl_secs.map(validate_ttl_secs).transpose()?;
        let precision = overrides.geohash_precision.map(validate_precision).transpose()?;

        if let Some(enabled) = overrides.cache_enabled {
            self.cache_enabled.update(enabled, ConfigSource::Cli);
        }

        if let Some(ttl) = ttl {
            self.cache_ttl_secs.update(ttl, ConfigSource::Cli);
        }

        if let Some(precision) = precision {
            self.geohash_precision.update(precision, ConfigSource::Cli);
        }

        Ok(())
    }

    /// Resolve the layered values into plain settings
    pub fn resolve(&self) -> LookupConfig {
        LookupConfig {
            cache_enabled: self.cache_enabled.value,
            cache_ttl: Duration::from_secs(self.cache_ttl_secs.value),
            geohash_precision: self.geohash_precision.value,
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "cache_enabled".to_string(),
            (self.cache_enabled.value.to_string(), self.cache_enabled.source),
        );

        map.insert(
            "cache_ttl_secs".to_string(),
            (format!("{}s", self.cache_ttl_secs.value), self.cache_ttl_secs.source),
        );

        map.insert(
            "geohash_precision".to_string(),
            (self.geohash_precision.value.to_string(), self.geohash_precision.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    cache_enabled: Option<bool>,
    cache_ttl_secs: Option<u64>,
    geohash_precision: Option<usize>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub cache_enabled: Option<bool>,
    pub cache_ttl_secs: Option<u64>,
    pub geohash_precision: Option<usize>,
}

/// Parse a boolean flag from string
pub fn parse_bool(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(QeatsError::ConfigInvalid {
            key: "cache_enabled".to_string(),
            reason: format!("Invalid boolean: {}. Use true or false", s),
        }),
    }
}

/// Parse a cache TTL in seconds from string
pub fn parse_ttl_secs(s: &str) -> Result<u64> {
    let ttl = s.trim().parse::<u64>().map_err(|e| QeatsError::ConfigInvalid {
        key: "cache_ttl_secs".to_string(),
        reason: format!("Invalid TTL '{}': {}", s, e),
    })?;
    validate_ttl_secs(ttl)
}

/// Parse a geohash precision from string
pub fn parse_precision(s: &str) -> Result<usize> {
    let precision = s.trim().parse::<usize>().map_err(|e| QeatsError::ConfigInvalid {
        key: "geohash_precision".to_string(),
        reason: format!("Invalid precision '{}': {}", s, e),
    })?;
    validate_precision(precision)
}

fn validate_ttl_secs(ttl: u64) -> Result<u64> {
    if ttl == 0 {
        return Err(QeatsError::ConfigInvalid {
            key: "cache_ttl_secs".to_string(),
            reason: "TTL must be at least one second".to_string(),
        });
    }
    Ok(ttl)
}

fn validate_precision(precision: usize) -> Result<usize> {
    if !(1..=MAX_GEOHASH_PRECISION).contains(&precision) {
        return Err(QeatsError::ConfigInvalid {
            key: "geohash_precision".to_string(),
            reason: format!(
                "Precision {} out of range. Use 1 to {}",
                precision, MAX_GEOHASH_PRECISION
            ),
        });
    }
    Ok(precision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LayeredConfig::with_defaults();
        assert!(config.cache_enabled.value);
        assert_eq!(config.cache_ttl_secs.value, 3600);
        assert_eq!(config.cache_ttl_secs.source, ConfigSource::Default);
        assert_eq!(config.geohash_precision.value, 7);
        assert_eq!(config.resolve(), LookupConfig::default());
    }

    #[test]
    fn test_config_precedence() {
        let mut value = ConfigValue::new(100, ConfigSource::Default);

        // File should override default
        value.update(200, ConfigSource::File);
        assert_eq!(value.value, 200);
        assert_eq!(value.source, ConfigSource::File);

        // Environment should override file
        value.update(300, ConfigSource::Environment);
        assert_eq!(value.value, 300);
        assert_eq!(value.source, ConfigSource::Environment);

        // CLI should override environment
        value.update(400, ConfigSource::Cli);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);

        // Lower precedence should not override
        value.update(500, ConfigSource::File);
        assert_eq!(value.value, 400);
        assert_eq!(value.source, ConfigSource::Cli);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
cache_enabled = false
cache_ttl_secs = 120
geohash_precision = 6
"#
        )
        .unwrap();

        let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

        assert!(!config.cache_enabled.value);
        assert_eq!(config.cache_enabled.source, ConfigSource::File);
        assert_eq!(config.cache_ttl_secs.value, 120);
        assert_eq!(config.geohash_precision.value, 6);

        let resolved = config.resolve();
        assert_eq!(resolved.cache_ttl, Duration::from_secs(120));
    }

    #[test]
    fn test_file_rejects_out_of_range_precision() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "geohash_precision = 13").unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, QeatsError::ConfigInvalid { ref key, .. } if key == "geohash_precision"));
    }

    #[test]
    fn test_file_rejects_zero_ttl() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "cache_ttl_secs = 0").unwrap();

        let err = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, QeatsError::ConfigInvalid { ref key, .. } if key == "cache_ttl_secs"));
    }

    #[test]
    fn test_missing_file() {
        let err = LayeredConfig::with_defaults()
            .load_from_file("/nonexistent/qeats.toml")
            .unwrap_err();
        assert!(matches!(err, QeatsError::ConfigFileNotFound { .. }));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = LayeredConfig::with_defaults();
        config
            .update_from_cli(CliConfigOverrides {
                cache_enabled: Some(false),
                cache_ttl_secs: None,
                geohash_precision: Some(5),
            })
            .unwrap();

        assert!(!config.cache_enabled.value);
        assert_eq!(config.cache_enabled.source, ConfigSource::Cli);
        assert_eq!(config.cache_ttl_secs.source, ConfigSource::Default);
        assert_eq!(config.geohash_precision.value, 5);
    }

    #[test]
    fn test_cli_rejects_out_of_range_values() {
        let mut config = LayeredConfig::with_defaults();

        let err = config
            .update_from_cli(CliConfigOverrides {
                cache_enabled: Some(false),
                cache_ttl_secs: None,
                geohash_precision: Some(40),
            })
            .unwrap_err();
        assert!(matches!(err, QeatsError::ConfigInvalid { ref key, .. } if key == "geohash_precision"));

        let err = config
            .update_from_cli(CliConfigOverrides {
                cache_ttl_secs: Some(0),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, QeatsError::ConfigInvalid { ref key, .. } if key == "cache_ttl_secs"));

        // A rejected override leaves every value untouched
        assert!(config.cache_enabled.value);
        assert_eq!(config.cache_enabled.source, ConfigSource::Default);
        assert_eq!(config.resolve(), LookupConfig::default());
    }

    #[test]
    fn test_parse_helpers() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(!parse_bool("off").unwrap());
        assert!(parse_bool("maybe").is_err());

        assert_eq!(parse_ttl_secs(" 90 ").unwrap(), 90);
        assert!(parse_ttl_secs("0").is_err());
        assert!(parse_ttl_secs("-5").is_err());

        assert_eq!(parse_precision("12").unwrap(), 12);
        assert!(parse_precision("0").is_err());
    }

    #[test]
    fn test_inspection_map() {
        let config = LayeredConfig::with_defaults();
        let map = config.to_inspection_map();

        assert_eq!(map.get("cache_ttl_secs").unwrap().0, "3600s");
        assert_eq!(map.get("geohash_precision").unwrap().1, ConfigSource::Default);
    }
}
