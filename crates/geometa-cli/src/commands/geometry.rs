//! Geometry command implementation

use crate::cli::GeometryArgs;
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::GeometryOutput;
use anyhow::{Context, Result};
use geojson::GeoJson;
use geometa_core::config::CliConfigOverrides;
use geometa_geo::GeometryRepairer;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

pub fn execute(
    args: GeometryArgs,
    config_path: Option<&Path>,
    output: &OutputWriter,
) -> Result<()> {
    let overrides = CliConfigOverrides {
        max_decimal_places: args.precision,
        geometry_validity: args.validity.map(Into::into),
        ..Default::default()
    };
    let config = load_config(config_path, overrides)?;
    let codec = config.geometry_codec().context("Invalid precision")?;
    let mode = config.geometry_validity.value;

    let content = read_input(&args.input)?;
    let input: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON from {}", args.input))?;
    let (items, single) = collect_geometries(input)?;

    let repairer = GeometryRepairer::new();
    let mut invalid = 0;
    let mut unrepairable = 0;
    let mut geometries = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let Some(value) = item else {
            geometries.push(Value::Null);
            continue;
        };

        let geometry = match codec.decode(value) {
            Ok(geometry) => geometry,
            Err(e) => {
                invalid += 1;
                output.warning(format!(
                    "Geometry #{} could not be decoded: {}; writing null",
                    index, e
                ));
                geometries.push(Value::Null);
                continue;
            }
        };

        match repairer.apply(mode, &geometry) {
            Some(valid) => geometries.push(codec.encode(&valid)),
            None => {
                unrepairable += 1;
                output.warning(format!(
                    "Geometry #{} ({}) could not be repaired; writing null",
                    index,
                    geometry.geometry_type()
                ));
                geometries.push(Value::Null);
            }
        }
    }

    tracing::debug!(count = geometries.len(), invalid, unrepairable, "Processed geometries");

    if output.is_json() {
        output.result(GeometryOutput {
            processed: geometries.len(),
            invalid,
            unrepairable,
            max_decimal_places: codec.max_decimal_places(),
            validity: format!("{:?}", mode),
            geometries,
        })?;
    } else if single {
        output.data(&geometries.into_iter().next().unwrap_or(Value::Null))?;
    } else {
        output.data(&geometries)?;
    }

    Ok(())
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content).context("Failed to read stdin")?;
        Ok(content)
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
    }
}

/// Pull geometry objects out of the input document
///
/// Accepts a bare geometry, an array of geometries, a Feature or a
/// FeatureCollection. Features without a geometry yield `None`. The flag is
/// true when the input held exactly one bare geometry.
fn collect_geometries(input: Value) -> Result<(Vec<Option<Value>>, bool)> {
    let is_feature = matches!(
        input.get("type").and_then(Value::as_str),
        Some("Feature") | Some("FeatureCollection")
    );

    if let Value::Array(items) = input {
        return Ok((items.into_iter().map(Some).collect(), false));
    }
    if !is_feature {
        return Ok((vec![Some(input)], true));
    }

    let features = match GeoJson::from_json_value(input).context("Invalid GeoJSON document")? {
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Geometry(_) => vec![],
    };

    let geometries = features
        .into_iter()
        .map(|feature| feature.geometry.map(serde_json::to_value).transpose())
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((geometries, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geometa_core::models::Geometry;
    use geometa_core::GeometryCodec;
    use serde_json::json;

    #[test]
    fn test_collect_single_geometry() {
        let (items, single) =
            collect_geometries(json!({"type": "Point", "coordinates": [1.0, 2.0]})).unwrap();
        assert!(single);
        assert_eq!(items, vec![Some(json!({"type": "Point", "coordinates": [1.0, 2.0]}))]);
    }

    #[test]
    fn test_collect_array() {
        let (items, single) = collect_geometries(json!([
            {"type": "Point", "coordinates": [1.0, 2.0]},
            {"type": "Point", "coordinates": [3.0, 4.0]}
        ]))
        .unwrap();
        assert!(!single);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_collect_feature_collection() {
        let (items, single) = collect_geometries(json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {},
                    "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}
                },
                {"type": "Feature", "properties": {}, "geometry": null}
            ]
        }))
        .unwrap();

        assert!(!single);
        assert_eq!(items.len(), 2);
        let first = items[0].as_ref().unwrap();
        assert_eq!(first["type"], "Point");
        assert_eq!(first["coordinates"], json!([1.0, 2.0]));
        assert!(items[1].is_none());
    }

    #[test]
    fn test_decoded_feature_geometry() {
        let (items, _) = collect_geometries(json!({
            "type": "Feature",
            "properties": null,
            "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.5, 2.5]]}
        }))
        .unwrap();

        let geometry = GeometryCodec::new().decode(items[0].as_ref().unwrap()).unwrap();
        assert_eq!(geometry, Geometry::line_string(vec![[0.0, 0.0], [1.5, 2.5]]));
    }
}
