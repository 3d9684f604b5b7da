//! Research discipline registry
//!
//! Codes are three digit area codes (`"101"`) optionally followed by a two
//! digit discipline code (`"101-02"`). The first digit of an area code is the
//! code of its category. The registry is a two-level map (area, then
//! discipline) that is built once and only read afterwards.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::{GeometaError, Result};
use crate::models::vocabulary::{ResearchArea, ResearchCategory, ResearchDiscipline};

const EMBEDDED_VOCABULARY: &str = include_str!("../data/research_disciplines.toml");

static CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{3})(?:-(\d{2}))?$").expect("Invalid code regex"));

static REGISTRY: Lazy<DisciplineRegistry> = Lazy::new(|| {
    DisciplineRegistry::from_toml_str(EMBEDDED_VOCABULARY)
        .expect("Embedded research discipline vocabulary is invalid")
});

/// The process-wide registry built from the embedded vocabulary
pub fn registry() -> &'static DisciplineRegistry {
    &REGISTRY
}

/// Split a code string into its area and optional discipline part
pub fn parse_code(code: &str) -> Option<(u16, Option<u8>)> {
    let caps = CODE_RE.captures(code.trim())?;
    let area = caps.get(1)?.as_str().parse().ok()?;
    let discipline = match caps.get(2) {
        Some(m) => Some(m.as_str().parse().ok()?),
        None => None,
    };
    Some((area, discipline))
}

/// Result of resolving a code string
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VocabularyEntry<'a> {
    Area(&'a ResearchArea),
    Discipline(&'a ResearchDiscipline),
}

impl VocabularyEntry<'_> {
    pub fn code_string(&self) -> String {
        match self {
            VocabularyEntry::Area(area) => area.code_string(),
            VocabularyEntry::Discipline(discipline) => discipline.code_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            VocabularyEntry::Area(area) => &area.name,
            VocabularyEntry::Discipline(discipline) => &discipline.name,
        }
    }

    /// Name of the category the entry belongs to
    pub fn category(&self) -> &str {
        match self {
            VocabularyEntry::Area(area) => &area.category,
            VocabularyEntry::Discipline(discipline) => &discipline.area.category,
        }
    }
}

#[derive(Debug)]
struct AreaNode {
    area: Arc<ResearchArea>,
    disciplines: BTreeMap<u8, ResearchDiscipline>,
}

/// Immutable category → area → discipline lookup
#[derive(Debug)]
pub struct DisciplineRegistry {
    categories: BTreeMap<u8, ResearchCategory>,
    areas: BTreeMap<u16, AreaNode>,
}

/// Vocabulary source file layout
#[derive(Debug, Deserialize)]
struct VocabularySource {
    #[serde(default, rename = "category")]
    categories: Vec<CategorySource>,
    #[serde(default, rename = "area")]
    areas: Vec<AreaSource>,
}

#[derive(Debug, Deserialize)]
struct CategorySource {
    code: u8,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AreaSource {
    code: u16,
    name: String,
    category: String,
    #[serde(default)]
    disciplines: Vec<DisciplineSource>,
}

#[derive(Debug, Deserialize)]
struct DisciplineSource {
    code: u8,
    name: String,
}

impl DisciplineRegistry {
    /// Build a registry from a TOML vocabulary source
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let source: VocabularySource = toml::from_str(content).map_err(|e| {
            GeometaError::Vocabulary { reason: format!("Failed to parse TOML: {}", e) }
        })?;
        Self::build(source)
    }

    /// Build a registry from a TOML vocabulary file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    fn build(source: VocabularySource) -> Result<Self> {
        let mut categories = BTreeMap::new();
        for category in source.categories {
            if categories.contains_key(&category.code) {
                return Err(vocabulary_error(format!(
                    "duplicate category code {}",
                    category.code
                )));
            }
            categories.insert(
                category.code,
                ResearchCategory { code: category.code, name: category.name },
            );
        }

        let mut areas = BTreeMap::new();
        for area in source.areas {
            if area.code > 999 {
                return Err(vocabulary_error(format!(
                    "area code {} has more than three digits",
                    area.code
                )));
            }
            if areas.contains_key(&area.code) {
                return Err(vocabulary_error(format!("duplicate area code {:03}", area.code)));
            }
            if !categories.values().any(|c: &ResearchCategory| c.name == area.category) {
                return Err(vocabulary_error(format!(
                    "area {:03} refers to unknown category '{}'",
                    area.code, area.category
                )));
            }

            let research_area = Arc::new(ResearchArea {
                code: area.code,
                name: area.name,
                category: area.category,
            });

            let mut disciplines = BTreeMap::new();
            for discipline in area.disciplines {
                if discipline.code > 99 {
                    return Err(vocabulary_error(format!(
                        "discipline code {} in area {:03} has more than two digits",
                        discipline.code, area.code
                    )));
                }
                if disciplines.contains_key(&discipline.code) {
                    return Err(vocabulary_error(format!(
                        "duplicate discipline code {:03}-{:02}",
                        area.code, discipline.code
                    )));
                }
                disciplines.insert(
                    discipline.code,
                    ResearchDiscipline {
                        code: discipline.code,
                        name: discipline.name,
                        area: Arc::clone(&research_area),
                    },
                );
            }

            areas.insert(area.code, AreaNode { area: research_area, disciplines });
        }

        tracing::debug!(
            categories = categories.len(),
            areas = areas.len(),
            "Built research discipline registry"
        );

        Ok(Self { categories, areas })
    }

    /// Resolve a formatted code (`"AAA"` or `"AAA-DD"`)
    pub fn resolve(&self, code: &str) -> Option<VocabularyEntry<'_>> {
        let (area_code, discipline_code) = parse_code(code)?;
        match discipline_code {
            None => self.area(area_code).map(VocabularyEntry::Area),
            Some(d) => self.discipline(area_code, d).map(VocabularyEntry::Discipline),
        }
    }

    pub fn category(&self, code: u8) -> Option<&ResearchCategory> {
        self.categories.get(&code)
    }

    pub fn area(&self, code: u16) -> Option<&ResearchArea> {
        self.areas.get(&code).map(|node| node.area.as_ref())
    }

    pub fn discipline(&self, area: u16, code: u8) -> Option<&ResearchDiscipline> {
        self.areas.get(&area)?.disciplines.get(&code)
    }

    pub fn categories(&self) -> impl Iterator<Item = &ResearchCategory> {
        self.categories.values()
    }

    pub fn areas(&self) -> impl Iterator<Item = &ResearchArea> {
        self.areas.values().map(|node| node.area.as_ref())
    }

    /// Disciplines of an area in code order; empty for unknown areas
    pub fn disciplines(&self, area: u16) -> impl Iterator<Item = &ResearchDiscipline> {
        self.areas.get(&area).into_iter().flat_map(|node| node.disciplines.values())
    }

    /// The category record a resolved entry belongs to
    pub fn category_of(&self, entry: &VocabularyEntry<'_>) -> Option<&ResearchCategory> {
        let name = entry.category();
        self.categories.values().find(|category| category.name == name)
    }

    /// Areas belonging to the named category
    pub fn areas_in_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a ResearchArea> + 'a {
        self.areas().filter(move |area| area.category == category)
    }
}

fn vocabulary_error(reason: String) -> GeometaError {
    GeometaError::Vocabulary { reason }
}
