//! Date dispatch adapter
//!
//! A date object on the wire looks like
//! `{"dateType": "Created", "value": "2020-01-01", "dateInformation": "..."}`.
//! Whether `value` is a single date or a range is decided lexically: a value
//! containing [`crate::models::RANGE_SEPARATOR`] is a range. Each part is then interpreted
//! best-effort; text that cannot be read as a date is kept verbatim.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GeometaError, Result};
use crate::models::date::{DateMeta, DatePrecision, DateType, DateValue, ParsedDate};

// YYYY, YYYY-MM or YYYY-MM-DD
static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})(?:-(\d{1,2})(?:-(\d{1,2}))?)?$").expect("Invalid ISO date regex")
});

// Full or abbreviated English month names
static MONTH_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\b",
    )
    .expect("Invalid month name regex")
});

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("Invalid number regex"));

const DATETIME_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// Decode a `{dateType, value, dateInformation}` object
pub fn decode_date(value: &Value) -> Result<DateValue> {
    let object = value
        .as_object()
        .ok_or_else(|| GeometaError::malformed_date("date must be a JSON object"))?;

    let raw_type = object
        .get("dateType")
        .ok_or_else(|| GeometaError::malformed_date("missing 'dateType' field"))?;

    let raw_value = object
        .get("value")
        .ok_or_else(|| GeometaError::malformed_date("missing 'value' field"))?
        .as_str()
        .ok_or_else(|| GeometaError::malformed_date("'value' must be a string"))?;

    let meta = DateMeta {
        date_type: decode_date_type(raw_type),
        information: object.get("dateInformation").and_then(Value::as_str).map(str::to_string),
    };

    Ok(DateValue::from_raw(raw_value, meta))
}

/// Encode a date value; absent type and information are omitted
pub fn encode_date(date: &DateValue) -> Value {
    let mut object = Map::new();
    object.insert("value".to_string(), Value::String(date.raw_value()));
    if let Some(date_type) = date.date_type() {
        object.insert("dateType".to_string(), Value::String(date_type.as_str().to_string()));
    }
    if let Some(information) = date.information() {
        object.insert("dateInformation".to_string(), Value::String(information.to_string()));
    }
    Value::Object(object)
}

fn decode_date_type(value: &Value) -> Option<DateType> {
    match value {
        Value::Null => {
            tracing::debug!("dateType is null, keeping the date without a type");
            None
        }
        Value::String(name) => {
            let date_type = DateType::from_name(name);
            if date_type.is_none() {
                tracing::warn!("Unknown dateType '{}', keeping the date without a type", name);
            }
            date_type
        }
        other => {
            tracing::warn!("dateType must be a string, found {}", other);
            None
        }
    }
}

/// Interpret free-form date text
///
/// Tries RFC 3339 timestamps, ISO 8601 calendar dates (`YYYY`, `YYYY-MM`,
/// `YYYY-MM-DD`), then month names and bare day/month/year numbers.
pub fn parse_date_text(text: &str) -> Option<ParsedDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(ParsedDate { date: datetime.date_naive(), precision: DatePrecision::Day });
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ParsedDate { date: datetime.date(), precision: DatePrecision::Day });
        }
    }

    if let Some(caps) = ISO_DATE_RE.captures(text) {
        let year = caps.get(1)?.as_str().parse().ok()?;
        let month = caps.get(2).map(|m| m.as_str().parse()).transpose().ok()?;
        let day = caps.get(3).map(|m| m.as_str().parse()).transpose().ok()?;
        return build_date(year, month, day);
    }

    parse_free_text(text)
}

fn parse_free_text(text: &str) -> Option<ParsedDate> {
    let numbers: Vec<&str> = NUMBER_RE.find_iter(text).map(|m| m.as_str()).collect();

    if let Some(caps) = MONTH_NAME_RE.captures(text) {
        let month = month_number(caps.get(1)?.as_str())?;
        let year = numbers.iter().find(|n| n.len() == 4)?.parse().ok()?;
        let day = numbers.iter().find(|n| n.len() <= 2).and_then(|n| n.parse().ok());
        return build_date(year, Some(month), day);
    }

    match numbers.as_slice() {
        [year] if year.len() == 4 => build_date(year.parse().ok()?, None, None),
        [year, month] | [month, year] if year.len() == 4 => {
            build_date(year.parse().ok()?, Some(month.parse().ok()?), None)
        }
        [year, month, day] if year.len() == 4 => {
            build_date(year.parse().ok()?, Some(month.parse().ok()?), Some(day.parse().ok()?))
        }
        // Day first, as in 24.12.2019
        [day, month, year] if year.len() == 4 => {
            build_date(year.parse().ok()?, Some(month.parse().ok()?), Some(day.parse().ok()?))
        }
        _ => None,
    }
}

fn build_date(year: i32, month: Option<u32>, day: Option<u32>) -> Option<ParsedDate> {
    let precision = match (month, day) {
        (None, _) => DatePrecision::Year,
        (Some(_), None) => DatePrecision::Month,
        (Some(_), Some(_)) => DatePrecision::Day,
    };
    let date = NaiveDate::from_ymd_opt(year, month.unwrap_or(1), day.unwrap_or(1))?;
    Some(ParsedDate { date, precision })
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_ascii_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

impl Serialize for DateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        encode_date(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        decode_date(&value).map_err(de::Error::custom)
    }
}
