//! Command line interface for `run`.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use indexmap::IndexMap;

use super::output::{write_all, ExportFormat};
use super::RunConfig;
use crate::common::expand_path;
use crate::db::{flat::FlatFileSource, Database, FusionSource};
use crate::score::Weights;

/// Parse a `KEY=PATH` tool output argument.
fn parse_tool_file(value: &str) -> Result<(String, PathBuf), String> {
    let (key, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=PATH, got {:?}", value))?;
    Ok((key.trim().to_owned(), PathBuf::from(expand_path(path.trim()))))
}

/// Command line arguments for `run` sub command.
#[derive(Parser, Debug)]
#[command(about = "Aggregate and score fusion calls of one sample", long_about = None)]
pub struct Args {
    /// Tool output as `KEY=PATH`, e.g., `arriba=sample.arriba.tsv`; may be given multiple times.
    #[arg(long = "tool", value_name = "KEY=PATH", required = true, value_parser = parse_tool_file)]
    pub tool_files: Vec<(String, PathBuf)>,
    /// Directory with the reference database exports, no enrichment if missing.
    #[arg(long)]
    pub path_db: Option<PathBuf>,
    /// Reference databases to use for enrichment and scoring.
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = Database::DEFAULT_ENABLED
    )]
    pub databases: Vec<Database>,
    /// Optional JSON file with tool and database weights.
    #[arg(long)]
    pub path_weights: Option<PathBuf>,
    /// Minimal number of tools that must detect a fusion for the filtered list.
    #[arg(long, default_value_t = 2)]
    pub tool_cutoff: usize,
    /// Keep all gene symbol combinations of records with multiple candidates.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub allow_multiple_gene_symbols: bool,
    /// Path to the output directory.
    #[arg(long)]
    pub path_output: PathBuf,
    /// Export formats to write besides the fusion lists.
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [ExportFormat::Json, ExportFormat::Csv]
    )]
    pub export: Vec<ExportFormat>,
    /// Write gzip-compressed output files.
    #[arg(long, default_value_t = false)]
    pub compress: bool,
}

/// Build the database sources from the command line.
fn sources(args: &Args) -> Vec<Box<dyn FusionSource>> {
    match &args.path_db {
        Some(path_db) => args
            .databases
            .iter()
            .map(|database| {
                Box::new(FlatFileSource::in_dir(*database, path_db)) as Box<dyn FusionSource>
            })
            .collect(),
        None => {
            tracing::warn!("no database directory given, fusions are not enriched");
            Vec::new()
        }
    }
}

/// Main entry point for the `run` sub command.
pub fn run(common_args: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("Starting `run` of fusion-report {}", crate::common::version());
    tracing::info!("  common_args = {:?}", &common_args);
    tracing::info!("  args = {:?}", &args);

    let weights = match &args.path_weights {
        Some(path) => Weights::from_path(path)?,
        None => Weights::default(),
    };
    let config = RunConfig::new(
        args.tool_files.iter().cloned().collect::<IndexMap<_, _>>(),
        weights,
        args.tool_cutoff,
        args.allow_multiple_gene_symbols,
    );
    let aggregation = super::run(&config, &sources(args))?;

    tracing::info!("writing results to {:?}...", &args.path_output);
    write_all(&args.path_output, &aggregation, &args.export, args.compress)?;
    tracing::info!("... done writing results");

    Ok(())
}
