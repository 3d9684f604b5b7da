//! Command implementations

mod config;
mod date;
mod discipline;
mod geometry;

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Geometry(args) => geometry::execute(args, config_path, &output),
        Commands::Date(args) => date::execute(args, &output),
        Commands::Discipline(args) => discipline::execute(args, config_path, &output),
        Commands::Config => config::execute(config_path, &output),
    }
}
