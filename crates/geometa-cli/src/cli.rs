use clap::{Parser, Subcommand};
use geometa_core::models::ValidityMode;
use std::path::PathBuf;

/// Geometa - Research metadata geometry, date and vocabulary tools
#[derive(Parser, Debug)]
#[command(name = "geometa")]
#[command(about = "Research metadata geometry, date and vocabulary tools", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./geometa.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode, repair and re-encode GeoJSON geometries
    Geometry(GeometryArgs),

    /// Decode a research metadata date
    Date(DateArgs),

    /// Resolve a research discipline code
    Discipline(DisciplineArgs),

    /// Show the layered configuration and where each value came from
    Config,
}

/// Geometry validity handling
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ValidityArg {
    /// Pass geometries through untouched
    Skip,
    /// Repair invalid polygons
    Repair,
}

impl From<ValidityArg> for ValidityMode {
    fn from(arg: ValidityArg) -> Self {
        match arg {
            ValidityArg::Skip => ValidityMode::Skip,
            ValidityArg::Repair => ValidityMode::Repair,
        }
    }
}

#[derive(Parser, Debug)]
pub struct GeometryArgs {
    /// GeoJSON file: a geometry, an array of geometries, a Feature or a
    /// FeatureCollection ("-" reads stdin)
    #[arg(default_value = "-")]
    pub input: String,

    /// Maximum number of decimal places written per coordinate
    #[arg(long, value_name = "N")]
    pub precision: Option<u32>,

    /// Geometry validity mode
    #[arg(long, value_enum)]
    pub validity: Option<ValidityArg>,
}

#[derive(Parser, Debug)]
pub struct DateArgs {
    /// Date value, e.g. "2020-01-01" or "2020-01-01/2020-12-31"
    pub value: String,

    /// DataCite date type (e.g. Collected, Created, Issued)
    #[arg(long, value_name = "TYPE")]
    pub date_type: Option<String>,

    /// Free-text information about the date
    #[arg(long, value_name = "TEXT")]
    pub info: Option<String>,
}

#[derive(Parser, Debug)]
pub struct DisciplineArgs {
    /// Area code ("101") or discipline code ("101-02")
    pub code: Option<String>,

    /// List areas, or the disciplines of the given area
    #[arg(long)]
    pub list: bool,

    /// Vocabulary source file replacing the embedded vocabulary
    #[arg(long, value_name = "PATH")]
    pub vocabulary: Option<PathBuf>,
}
