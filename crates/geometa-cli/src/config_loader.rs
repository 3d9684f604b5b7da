//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use geometa_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

/// Configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "geometa.toml";

/// Load layered configuration: defaults, file, environment, then CLI overrides
///
/// Without an explicit path, `geometa.toml` in the working directory is used
/// when it exists.
pub fn load_config(path: Option<&Path>, overrides: CliConfigOverrides) -> Result<LayeredConfig> {
    let file = match path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    };

    let mut config = LayeredConfig::with_defaults();
    if let Some(file) = file {
        config = config
            .load_from_file(&file)
            .with_context(|| format!("Failed to load configuration file {}", file.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometa_core::config::ConfigSource;
    use geometa_core::models::ValidityMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_explicit_file_and_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_decimal_places = 4\ngeometry_validity = \"Skip\"").unwrap();

        let config = load_config(
            Some(file.path()),
            CliConfigOverrides { geometry_validity: Some(ValidityMode::Repair), ..Default::default() },
        )
        .unwrap();

        assert_eq!(config.geometry_validity.value, ValidityMode::Repair);
        assert_eq!(config.geometry_validity.source, ConfigSource::Cli);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let result = load_config(Some(Path::new("/nonexistent/geometa.toml")), Default::default());
        assert!(result.is_err());
    }
}
