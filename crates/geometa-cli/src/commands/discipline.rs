//! Discipline command implementation

use crate::cli::DisciplineArgs;
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use crate::output_types::DisciplineOutput;
use anyhow::{Context, Result};
use geometa_core::config::CliConfigOverrides;
use geometa_core::vocabulary::parse_code;
use geometa_core::{registry, DisciplineRegistry, VocabularyEntry};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
struct AreaRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Area")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Disciplines")]
    disciplines: usize,
}

#[derive(Tabled, Serialize)]
struct DisciplineRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Discipline")]
    name: String,
}

pub fn execute(
    args: DisciplineArgs,
    config_path: Option<&Path>,
    output: &OutputWriter,
) -> Result<()> {
    let overrides =
        CliConfigOverrides { vocabulary_path: args.vocabulary.clone(), ..Default::default() };
    let config = load_config(config_path, overrides)?;

    let custom;
    let vocabulary: &DisciplineRegistry = match &config.vocabulary_path.value {
        Some(path) => {
            custom = DisciplineRegistry::from_toml_file(path)
                .with_context(|| format!("Failed to load vocabulary {}", path.display()))?;
            &custom
        }
        None => registry(),
    };

    if args.list {
        let area = args.code.as_deref().and_then(parse_code).map(|(area, _)| area);
        return list(vocabulary, area, output);
    }

    let Some(code) = args.code else {
        output.warning("No code given; pass a code such as 101 or 101-02, or use --list");
        return Ok(());
    };

    match vocabulary.resolve(&code) {
        Some(entry) => show(vocabulary, &entry, output),
        None => {
            output.warning(format!("Unknown vocabulary code '{}'", code));
            if output.is_json() {
                output.result(Option::<DisciplineOutput>::None)?;
            }
            Ok(())
        }
    }
}

fn show(
    vocabulary: &DisciplineRegistry,
    entry: &VocabularyEntry<'_>,
    output: &OutputWriter,
) -> Result<()> {
    let (category, area) = match entry {
        VocabularyEntry::Area(area) => (area.category.as_str(), None),
        VocabularyEntry::Discipline(discipline) => {
            let (category, area, _) = discipline.hierarchy();
            (category, Some(area.to_string()))
        }
    };
    let category_code = vocabulary.category_of(entry).map(|category| category.code);

    if output.is_json() {
        return output.result(DisciplineOutput {
            code: entry.code_string(),
            name: entry.name().to_string(),
            category: category.to_string(),
            category_code,
            area,
        });
    }

    output.kv("Code", entry.code_string());
    output.kv("Name", entry.name());
    match category_code {
        Some(code) => output.kv("Category", format!("{} ({})", category, code)),
        None => output.kv("Category", category),
    }
    if let Some(area) = area {
        output.kv("Area", area);
    }
    Ok(())
}

fn list(vocabulary: &DisciplineRegistry, area: Option<u16>, output: &OutputWriter) -> Result<()> {
    match area.and_then(|code| vocabulary.area(code)) {
        Some(area) => {
            output.section(area);
            let rows: Vec<DisciplineRow> = vocabulary
                .disciplines(area.code)
                .map(|d| DisciplineRow { code: d.code_string(), name: d.name.clone() })
                .collect();
            output.table(rows)
        }
        None => {
            output.section("Research Areas");
            let rows: Vec<AreaRow> = vocabulary
                .categories()
                .flat_map(|category| vocabulary.areas_in_category(&category.name))
                .map(|a| AreaRow {
                    code: a.code_string(),
                    name: a.name.clone(),
                    category: a.category.clone(),
                    disciplines: vocabulary.disciplines(a.code).count(),
                })
                .collect();
            output.table(rows)
        }
    }
}
