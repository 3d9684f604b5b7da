//! Config command implementation

use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::ConfigValue;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
}

pub fn execute(config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let layered_config = load_config(config_path, Default::default())?;
    let inspection_map = layered_config.to_inspection_map();

    if output.is_json() {
        let values: BTreeMap<String, ConfigValue> = inspection_map
            .into_iter()
            .map(|(key, (value, source))| {
                (key, ConfigValue { value, source: format!("{:?}", source) })
            })
            .collect();
        output.result(values)?;
    } else {
        output.section("Configuration Values");

        let mut rows: Vec<ConfigRow> = inspection_map
            .into_iter()
            .map(|(key, (value, source))| ConfigRow {
                key,
                value,
                source: format!("{:?}", source),
            })
            .collect();

        // Sort by key for consistent output
        rows.sort_by(|a, b| a.key.cmp(&b.key));

        output.table(rows)?;

        output.section("Configuration Precedence");
        output.info("CLI arguments > Environment variables > Config file > Defaults");
    }

    Ok(())
}
