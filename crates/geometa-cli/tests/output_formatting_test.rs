//! Integration tests for output formatting
//!
//! These tests run the binary and verify its JSON and human output.

use serde_json::{json, Value};
use std::io::Write;
use std::process::{Command, Output};
use tempfile::{NamedTempFile, TempDir};

fn geometa(args: &[&str]) -> Output {
    let workdir = TempDir::new().unwrap();
    Command::new(env!("CARGO_BIN_EXE_geometa"))
        .args(args)
        .current_dir(workdir.path())
        .env_remove("GEOMETA_PRECISION")
        .env_remove("GEOMETA_GEOMETRY_VALIDITY")
        .env_remove("GEOMETA_VOCABULARY")
        .output()
        .expect("Failed to execute command")
}

fn json_stdout(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("Output should be valid JSON")
}

fn geojson_file(content: Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_geometry_repair_json_output() {
    let file = geojson_file(json!({
        "type": "Polygon",
        "coordinates": [[[0, 0], [2, 2], [2, 0], [0, 2], [0, 0]]]
    }));

    let output = geometa(&["geometry", file.path().to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "Command should succeed");

    let parsed = json_stdout(&output);
    assert_eq!(parsed["status"], "success");
    assert_eq!(parsed["data"]["processed"], 1);
    assert_eq!(parsed["data"]["unrepairable"], 0);
    assert_eq!(parsed["data"]["geometries"][0]["type"], "MultiPolygon");
}

#[test]
fn test_geometry_precision_human_output() {
    let file = geojson_file(json!({
        "type": "Point",
        "coordinates": [13.404954, 52.520008, 34.5678]
    }));

    let output = geometa(&["geometry", file.path().to_str().unwrap(), "--precision", "2"]);
    assert!(output.status.success(), "Command should succeed");

    let parsed = json_stdout(&output);
    assert_eq!(parsed, json!({"type": "Point", "coordinates": [13.4, 52.52, 34.57]}));
}

#[test]
fn test_geometry_feature_collection_skip_mode() {
    let file = geojson_file(json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [2, 2], [2, 0], [0, 2], [0, 0]]]}
            },
            {"type": "Feature", "properties": {}, "geometry": null}
        ]
    }));

    let output =
        geometa(&["geometry", file.path().to_str().unwrap(), "--validity", "skip", "--json"]);
    assert!(output.status.success(), "Command should succeed");

    let parsed = json_stdout(&output);
    assert_eq!(parsed["data"]["validity"], "Skip");
    assert_eq!(parsed["data"]["geometries"][0]["type"], "Polygon");
    assert_eq!(parsed["data"]["geometries"][1], Value::Null);
}

#[test]
fn test_undecodable_geometry_becomes_null() {
    let file = geojson_file(json!({"type": "Blob", "coordinates": [0, 0]}));

    let output = geometa(&["geometry", file.path().to_str().unwrap()]);
    assert!(output.status.success(), "Decode failures are per geometry");
    assert_eq!(json_stdout(&output), Value::Null);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Geometry #0"));
}

#[test]
fn test_mixed_array_keeps_valid_geometries() {
    let file = geojson_file(json!([
        {"type": "Point", "coordinates": [1.0, 2.0]},
        {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1]]]},
        {"type": "Point", "coordinates": [3.0, 4.0]}
    ]));

    let output = geometa(&["geometry", file.path().to_str().unwrap(), "--json"]);
    assert!(output.status.success(), "Command should succeed");

    let parsed = json_stdout(&output);
    let data = &parsed["data"];
    assert_eq!(data["processed"], 3);
    assert_eq!(data["invalid"], 1);
    assert_eq!(data["unrepairable"], 0);
    assert_eq!(data["geometries"][0], json!({"type": "Point", "coordinates": [1.0, 2.0]}));
    assert_eq!(data["geometries"][1], Value::Null);
    assert_eq!(data["geometries"][2], json!({"type": "Point", "coordinates": [3.0, 4.0]}));
}

#[test]
fn test_date_range_json_output() {
    let output = geometa(&["date", "2020-01-01/2020-12-31", "--date-type", "Collected", "--json"]);
    assert!(output.status.success(), "Command should succeed");

    let parsed = json_stdout(&output);
    let data = &parsed["data"];
    assert_eq!(data["kind"], "range");
    assert_eq!(data["encoded"]["dateType"], "Collected");
    assert_eq!(data["encoded"]["value"], "2020-01-01/2020-12-31");
    assert_eq!(data["parsed"][1]["date"], "2020-12-31");
}

#[test]
fn test_date_unknown_type_is_dropped() {
    let output = geometa(&["date", "2020", "--date-type", "Harvested", "--json"]);
    assert!(output.status.success(), "Unknown date types are soft failures");

    let parsed = json_stdout(&output);
    let data = &parsed["data"];
    assert_eq!(data["encoded"], json!({"value": "2020"}));
    assert_eq!(data["kind"], "single");
    assert_eq!(data["parsed"][0]["date"], "2020");
}

#[test]
fn test_discipline_json_output() {
    let output = geometa(&["discipline", "101-02", "--json"]);
    assert!(output.status.success(), "Command should succeed");

    let parsed = json_stdout(&output);
    assert_eq!(parsed["data"]["code"], "101-02");
    assert_eq!(parsed["data"]["category"], "Humanities and Social Sciences");
    assert_eq!(parsed["data"]["category_code"], 1);
    assert!(parsed["data"]["area"].is_string());
}

#[test]
fn test_discipline_area_json_output() {
    let output = geometa(&["discipline", "101", "--json"]);
    assert!(output.status.success(), "Command should succeed");

    let parsed = json_stdout(&output);
    assert_eq!(parsed["data"]["code"], "101");
    assert_eq!(parsed["data"]["category_code"], 1);
    assert_eq!(parsed["data"]["area"], Value::Null);
}

#[test]
fn test_discipline_list_json_output() {
    let output = geometa(&["discipline", "--list", "--json"]);
    assert!(output.status.success(), "Command should succeed");

    let parsed = json_stdout(&output);
    let rows = parsed["data"].as_array().expect("Area rows");
    assert!(!rows.is_empty());
    let codes: Vec<&str> = rows.iter().filter_map(|row| row["code"].as_str()).collect();
    let mut sorted = codes.clone();
    sorted.sort();
    assert_eq!(codes, sorted);
}

#[test]
fn test_unknown_discipline_is_not_an_error() {
    let output = geometa(&["discipline", "999-99", "--json"]);
    assert!(output.status.success(), "Unknown codes are soft failures");

    let parsed = json_stdout(&output);
    assert_eq!(parsed["data"], Value::Null);
}

#[test]
fn test_config_json_output() {
    let output = geometa(&["config", "--json"]);
    assert!(output.status.success(), "Command should succeed");

    let parsed = json_stdout(&output);
    assert_eq!(parsed["data"]["max_decimal_places"]["value"], "full");
    assert_eq!(parsed["data"]["max_decimal_places"]["source"], "Default");
    assert_eq!(parsed["data"]["geometry_validity"]["value"], "Repair");
}
