//! Date command implementation

use crate::cli::DateArgs;
use crate::output::OutputWriter;
use crate::output_types::{DateOutput, ParsedDateInfo};
use anyhow::{Context, Result};
use geometa_core::models::{DateText, DateValue};
use geometa_core::{decode_date, encode_date};
use serde_json::{Map, Value};

pub fn execute(args: DateArgs, output: &OutputWriter) -> Result<()> {
    let date = decode_date(&wire_object(&args)).context("Failed to decode date")?;

    let parts: Vec<&DateText> = match &date {
        DateValue::Single { value, .. } => vec![value],
        DateValue::Range { start, end, .. } => vec![start, end],
    };
    let kind = if date.is_range() { "range" } else { "single" };

    if output.is_json() {
        output.result(DateOutput {
            encoded: encode_date(&date),
            kind,
            parsed: parts.iter().map(|part| part.parsed.map(ParsedDateInfo::from)).collect(),
        })?;
        return Ok(());
    }

    output.section("Date");
    output.kv("Value", date.raw_value());
    output.kv("Kind", kind);
    if let Some(date_type) = date.date_type() {
        output.kv("Date type", date_type);
    }
    if let Some(information) = date.information() {
        output.kv("Information", information);
    }

    let labels: &[&str] = if date.is_range() { &["Start", "End"] } else { &["Parsed"] };
    for (label, part) in labels.iter().zip(parts) {
        match part.parsed.map(ParsedDateInfo::from) {
            Some(info) => output.kv(label, format!("{} ({:?})", info.date, info.precision)),
            None => output.warning(format!("{}: could not interpret '{}'", label, part.raw)),
        }
    }

    Ok(())
}

/// The `{dateType, value, dateInformation}` object for the arguments
fn wire_object(args: &DateArgs) -> Value {
    let mut object = Map::new();
    object.insert("value".to_string(), Value::String(args.value.clone()));
    object.insert(
        "dateType".to_string(),
        args.date_type.clone().map(Value::String).unwrap_or(Value::Null),
    );
    if let Some(information) = &args.info {
        object.insert("dateInformation".to_string(), Value::String(information.clone()));
    }
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: &str, date_type: Option<&str>, info: Option<&str>) -> DateArgs {
        DateArgs {
            value: value.to_string(),
            date_type: date_type.map(str::to_string),
            info: info.map(str::to_string),
        }
    }

    #[test]
    fn test_wire_object_without_type() {
        assert_eq!(
            wire_object(&args("2020", None, None)),
            json!({"value": "2020", "dateType": null})
        );
    }

    #[test]
    fn test_unknown_type_decodes_without_type() {
        let wire = wire_object(&args("2020", Some("Harvested"), Some("spring")));
        let date = decode_date(&wire).unwrap();
        assert_eq!(date.date_type(), None);
        assert_eq!(date.information(), Some("spring"));
        assert_eq!(date.raw_value(), "2020");
    }
}
