//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use geometa_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use geometa_core::models::ValidityMode;
use geometa_core::GeometaError;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn clear_env() {
    env::remove_var("GEOMETA_PRECISION");
    env::remove_var("GEOMETA_GEOMETRY_VALIDITY");
    env::remove_var("GEOMETA_VOCABULARY");
}

#[test]
fn test_partial_file_configuration() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
max_decimal_places = 5
# Only override precision, leave others as defaults
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.max_decimal_places.value, Some(5));
    assert_eq!(config.max_decimal_places.source, ConfigSource::File);
    assert_eq!(config.geometry_validity.value, ValidityMode::Repair);
    assert_eq!(config.geometry_validity.source, ConfigSource::Default);
}

#[test]
fn test_missing_file_is_config_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/geometa.toml");
    match result {
        Err(GeometaError::ConfigMissing { key }) => {
            assert!(key.contains("/nonexistent/geometa.toml"));
        }
        other => panic!("Expected ConfigMissing, got {:?}", other.map(|_| ())),
    }
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();

    env::set_var("GEOMETA_PRECISION", "2");
    env::set_var("GEOMETA_GEOMETRY_VALIDITY", "skip");
    env::set_var("GEOMETA_VOCABULARY", "/tmp/env-vocabulary.toml");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
max_decimal_places = 6
geometry_validity = "Repair"
vocabulary_path = "/tmp/file-vocabulary.toml"
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    // Environment should override file
    assert_eq!(config.max_decimal_places.value, Some(2));
    assert_eq!(config.max_decimal_places.source, ConfigSource::Environment);
    assert_eq!(config.geometry_validity.value, ValidityMode::Skip);
    assert_eq!(config.geometry_validity.source, ConfigSource::Environment);
    assert_eq!(config.vocabulary_path.value, Some(PathBuf::from("/tmp/env-vocabulary.toml")));

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();

    env::set_var("GEOMETA_PRECISION", "0");
    env::set_var("GEOMETA_GEOMETRY_VALIDITY", "sometimes");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.max_decimal_places.value, None);
    assert_eq!(config.max_decimal_places.source, ConfigSource::Default);
    assert_eq!(config.geometry_validity.value, ValidityMode::Repair);
    assert_eq!(config.geometry_validity.source, ConfigSource::Default);

    clear_env();
}

#[test]
#[serial]
fn test_configuration_precedence_order() {
    clear_env();
    env::set_var("GEOMETA_PRECISION", "3");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "max_decimal_places = 7").unwrap();

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    // At this point, environment should have overridden file
    assert_eq!(config.max_decimal_places.value, Some(3));
    assert_eq!(config.max_decimal_places.source, ConfigSource::Environment);

    // Now CLI should override environment
    config.update_from_cli(CliConfigOverrides {
        max_decimal_places: Some(1),
        ..Default::default()
    });

    assert_eq!(config.max_decimal_places.value, Some(1));
    assert_eq!(config.max_decimal_places.source, ConfigSource::Cli);

    let codec = config.geometry_codec().unwrap();
    assert_eq!(codec.max_decimal_places(), Some(1));

    clear_env();
}

#[test]
fn test_configuration_source_tracking() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "max_decimal_places = 4\ngeometry_validity = \"Skip\"").unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();
    let inspection_map = config.to_inspection_map();

    let (precision, source) = &inspection_map["max_decimal_places"];
    assert_eq!(precision, "4");
    assert_eq!(*source, ConfigSource::File);

    let (validity, source) = &inspection_map["geometry_validity"];
    assert_eq!(validity, "Skip");
    assert_eq!(*source, ConfigSource::File);

    let (vocabulary, source) = &inspection_map["vocabulary_path"];
    assert_eq!(vocabulary, "embedded");
    assert_eq!(*source, ConfigSource::Default);
}
