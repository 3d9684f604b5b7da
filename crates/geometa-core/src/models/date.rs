//! Date values attached to metadata records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codec::date::parse_date_text;

/// Separator that turns a date value into a range (ISO 8601 interval style)
pub const RANGE_SEPARATOR: char = '/';

/// DataCite date type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateType {
    Accepted,
    Available,
    Collected,
    Copyrighted,
    Created,
    Issued,
    Submitted,
    Updated,
    Valid,
    Withdrawn,
    Other,
}

impl DateType {
    const ALL: [DateType; 11] = [
        DateType::Accepted,
        DateType::Available,
        DateType::Collected,
        DateType::Copyrighted,
        DateType::Created,
        DateType::Issued,
        DateType::Submitted,
        DateType::Updated,
        DateType::Valid,
        DateType::Withdrawn,
        DateType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateType::Accepted => "Accepted",
            DateType::Available => "Available",
            DateType::Collected => "Collected",
            DateType::Copyrighted => "Copyrighted",
            DateType::Created => "Created",
            DateType::Issued => "Issued",
            DateType::Submitted => "Submitted",
            DateType::Updated => "Updated",
            DateType::Valid => "Valid",
            DateType::Withdrawn => "Withdrawn",
            DateType::Other => "Other",
        }
    }

    /// Match a wire name, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for DateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much of a parsed date was actually present in the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DatePrecision {
    Year,
    Month,
    Day,
}

/// A calendar date recovered from free text
///
/// Components missing from the text default to 1 in `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDate {
    pub date: NaiveDate,
    pub precision: DatePrecision,
}

/// Raw date text together with its best-effort interpretation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateText {
    pub raw: String,
    pub parsed: Option<ParsedDate>,
}

impl DateText {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_date_text(&raw);
        Self { raw, parsed }
    }
}

/// Fields shared by single dates and ranges
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateMeta {
    pub date_type: Option<DateType>,
    pub information: Option<String>,
}

/// A single point in time or a range of dates
///
/// Serde support goes through the wire format of [`crate::codec::date`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateValue {
    Single { value: DateText, meta: DateMeta },
    Range { start: DateText, end: DateText, meta: DateMeta },
}

impl DateValue {
    /// Build from a raw value, splitting at the first range separator
    pub fn from_raw(value: &str, meta: DateMeta) -> Self {
        match value.split_once(RANGE_SEPARATOR) {
            Some((start, end)) => {
                DateValue::Range { start: DateText::new(start), end: DateText::new(end), meta }
            }
            None => DateValue::Single { value: DateText::new(value), meta },
        }
    }

    pub fn meta(&self) -> &DateMeta {
        match self {
            DateValue::Single { meta, .. } | DateValue::Range { meta, .. } => meta,
        }
    }

    pub fn date_type(&self) -> Option<DateType> {
        self.meta().date_type
    }

    pub fn information(&self) -> Option<&str> {
        self.meta().information.as_deref()
    }

    pub fn is_range(&self) -> bool {
        matches!(self, DateValue::Range { .. })
    }

    /// The wire `value` string
    pub fn raw_value(&self) -> String {
        match self {
            DateValue::Single { value, .. } => value.raw.clone(),
            DateValue::Range { start, end, .. } => {
                format!("{}{}{}", start.raw, RANGE_SEPARATOR, end.raw)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_single() {
        let date = DateValue::from_raw("2020-01-01", DateMeta::default());
        assert!(!date.is_range());
        assert_eq!(date.raw_value(), "2020-01-01");
    }

    #[test]
    fn test_from_raw_splits_once() {
        let date = DateValue::from_raw("2020/2021/2022", DateMeta::default());
        match date {
            DateValue::Range { start, end, .. } => {
                assert_eq!(start.raw, "2020");
                assert_eq!(end.raw, "2021/2022");
            }
            other => panic!("Expected range, got {:?}", other),
        }
    }

    #[test]
    fn test_date_type_names() {
        assert_eq!(DateType::from_name("created"), Some(DateType::Created));
        assert_eq!(DateType::from_name(" Issued "), Some(DateType::Issued));
        assert_eq!(DateType::from_name("Harvested"), None);
        assert_eq!(DateType::Withdrawn.to_string(), "Withdrawn");
    }
}
