//! Research discipline vocabulary entries.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Top level of the classification, e.g. "Natural Sciences"
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearchCategory {
    pub code: u8,
    pub name: String,
}

/// A research area such as "Geosciences"
///
/// Areas are flat records and refer to their category by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearchArea {
    pub code: u16,
    pub name: String,
    pub category: String,
}

impl ResearchArea {
    /// Three digit code, e.g. `"101"`
    pub fn code_string(&self) -> String {
        format!("{:03}", self.code)
    }
}

/// A discipline within an area
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResearchDiscipline {
    pub code: u8,
    pub name: String,
    pub area: Arc<ResearchArea>,
}

impl ResearchDiscipline {
    /// Area and discipline code, e.g. `"101-02"`
    pub fn code_string(&self) -> String {
        format!("{:03}-{:02}", self.area.code, self.code)
    }

    /// Category name, area name and discipline name
    pub fn hierarchy(&self) -> (&str, &str, &str) {
        (&self.area.category, &self.area.name, &self.name)
    }
}

impl fmt::Display for ResearchDiscipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {} > {}", self.area.category, self.area.name, self.name)
    }
}

impl fmt::Display for ResearchArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {}", self.category, self.name)
    }
}
