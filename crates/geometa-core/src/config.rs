use crate::codec::geometry::GeometryCodec;
use crate::error::{GeometaError, Result};
use crate::models::geometry::ValidityMode;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

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

/// Layered configuration for Geometa
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub max_decimal_places: ConfigValue<Option<u32>>,
    pub geometry_validity: ConfigValue<ValidityMode>,
    pub vocabulary_path: ConfigValue<Option<PathBuf>>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            max_decimal_places: ConfigValue::new(None, ConfigSource::Default),
            geometry_validity: ConfigValue::new(ValidityMode::Repair, ConfigSource::Default),
            vocabulary_path: ConfigValue::new(None, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => GeometaError::ConfigMissing {
                key: format!("config file {}", path.as_ref().display()),
            },
            _ => GeometaError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            },
        })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeometaError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        // Update values from file
        if let Some(places) = file_config.max_decimal_places {
            let places = check_precision(places)?;
            self.max_decimal_places.update(Some(places), ConfigSource::File);
        }

        if let Some(geometry_validity) = file_config.geometry_validity {
            self.geometry_validity.update(geometry_validity, ConfigSource::File);
        }

        if let Some(vocabulary_path) = file_config.vocabulary_path {
            self.vocabulary_path.update(Some(vocabulary_path), ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEOMETA_PRECISION
        if let Ok(precision_str) = env::var("GEOMETA_PRECISION") {
            match parse_precision(&precision_str) {
                Ok(places) => {
                    self.max_decimal_places.update(Some(places), ConfigSource::Environment)
                }
                Err(_) => tracing::warn!(
                    "Invalid GEOMETA_PRECISION value '{}': expected a positive integer",
                    precision_str
                ),
            }
        }

        // GEOMETA_GEOMETRY_VALIDITY
        if let Ok(validity_str) = env::var("GEOMETA_GEOMETRY_VALIDITY") {
            match parse_validity_mode(&validity_str) {
                Ok(validity) => self.geometry_validity.update(validity, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOMETA_GEOMETRY_VALIDITY value '{}': expected skip or repair",
                    validity_str
                ),
            }
        }

        // GEOMETA_VOCABULARY
        if let Ok(path) = env::var("GEOMETA_VOCABULARY") {
            if path.trim().is_empty() {
                tracing::warn!("Ignoring empty GEOMETA_VOCABULARY");
            } else {
                self.vocabulary_path.update(Some(PathBuf::from(path)), ConfigSource::Environment);
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(places) = overrides.max_decimal_places {
            self.max_decimal_places.update(Some(places), ConfigSource::Cli);
        }

        if let Some(geometry_validity) = overrides.geometry_validity {
            self.geometry_validity.update(geometry_validity, ConfigSource::Cli);
        }

        if let Some(vocabulary_path) = overrides.vocabulary_path {
            self.vocabulary_path.update(Some(vocabulary_path), ConfigSource::Cli);
        }
    }

    /// Geometry codec writing at the configured precision
    pub fn geometry_codec(&self) -> Result<GeometryCodec> {
        GeometryCodec::from_precision(self.max_decimal_places.value)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "max_decimal_places".to_string(),
            (
                self.max_decimal_places
                    .value
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "full".to_string()),
                self.max_decimal_places.source,
            ),
        );

        map.insert(
            "geometry_validity".to_string(),
            (format!("{:?}", self.geometry_validity.value), self.geometry_validity.source),
        );

        map.insert(
            "vocabulary_path".to_string(),
            (
                self.vocabulary_path
                    .value
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "embedded".to_string()),
                self.vocabulary_path.source,
            ),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    max_decimal_places: Option<u32>,
    geometry_validity: Option<ValidityMode>,
    vocabulary_path: Option<PathBuf>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub max_decimal_places: Option<u32>,
    pub geometry_validity: Option<ValidityMode>,
    pub vocabulary_path: Option<PathBuf>,
}

/// Parse a decimal precision from string
pub fn parse_precision(s: &str) -> Result<u32> {
    let places = s.trim().parse::<u32>().map_err(|_| GeometaError::ConfigInvalid {
        key: "max_decimal_places".to_string(),
        reason: format!("Invalid precision: {}. Use a positive integer", s),
    })?;
    check_precision(places)
}

fn check_precision(places: u32) -> Result<u32> {
    if places == 0 {
        return Err(GeometaError::ConfigInvalid {
            key: "max_decimal_places".to_string(),
            reason: "Decimal places must be greater than zero".to_string(),
        });
    }
    Ok(places)
}

/// Parse validity mode from string
pub fn parse_validity_mode(s: &str) -> Result<ValidityMode> {
    match s.to_lowercase().as_str() {
        "skip" => Ok(ValidityMode::Skip),
        "repair" => Ok(ValidityMode::Repair),
        _ => Err(GeometaError::ConfigInvalid {
            key: "geometry_validity".to_string(),
            reason: format!("Invalid validity mode: {}. Use skip or repair", s),
        }),
    }
}
