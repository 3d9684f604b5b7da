use geometa_core::models::{DatePrecision, ParsedDate};
use serde::Serialize;
use serde_json::Value;

/// Output for geometry command
#[derive(Debug, Serialize)]
pub struct GeometryOutput {
    pub geometries: Vec<Value>,
    pub processed: usize,
    pub invalid: usize,
    pub unrepairable: usize,
    pub max_decimal_places: Option<u32>,
    pub validity: String,
}

/// Output for date command
#[derive(Debug, Serialize)]
pub struct DateOutput {
    pub encoded: Value,
    pub kind: &'static str,
    pub parsed: Vec<Option<ParsedDateInfo>>,
}

#[derive(Debug, Serialize)]
pub struct ParsedDateInfo {
    pub date: String,
    pub precision: DatePrecision,
}

impl From<ParsedDate> for ParsedDateInfo {
    fn from(parsed: ParsedDate) -> Self {
        let date = match parsed.precision {
            DatePrecision::Year => parsed.date.format("%Y"),
            DatePrecision::Month => parsed.date.format("%Y-%m"),
            DatePrecision::Day => parsed.date.format("%Y-%m-%d"),
        };
        Self { date: date.to_string(), precision: parsed.precision }
    }
}

/// Output for discipline command
#[derive(Debug, Serialize)]
pub struct DisciplineOutput {
    pub code: String,
    pub name: String,
    pub category: String,
    pub category_code: Option<u8>,
    pub area: Option<String>,
}

/// A configuration value with its source
#[derive(Debug, Serialize)]
pub struct ConfigValue {
    pub value: String,
    pub source: String,
}
