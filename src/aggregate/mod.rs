//! Aggregation of fusion calls: parse, merge, enrich and score.

pub mod cli;
pub mod output;

use std::{path::PathBuf, str::FromStr, time::Instant};

use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;
use strum::IntoEnumIterator;
use thousands::Separable;

use crate::common::io::is_non_empty_file;
use crate::db::{Database, FusionSource, MembershipIndex};
use crate::fusion::Fusion;
use crate::parsers::Tool;
use crate::registry::FusionRegistry;
use crate::score::Weights;

/// Settings of one aggregation run.
#[derive(Debug, Clone, derive_new::new)]
pub struct RunConfig {
    /// Output file per tool key, e.g. `arriba`.
    pub tool_files: IndexMap<String, PathBuf>,
    /// Scoring weights.
    pub weights: Weights,
    /// Minimal number of detecting tools for the filtered view.
    pub detection_cutoff: usize,
    /// Keep all gene symbol combinations of multi-gene records.
    pub allow_multiple_gene_symbols: bool,
}

/// Map tool keys to catalog entries; unknown keys are skipped with a warning.
fn resolve_tools(tool_files: &IndexMap<String, PathBuf>) -> IndexMap<Tool, PathBuf> {
    let mut result = IndexMap::new();
    for (key, path) in tool_files {
        match Tool::from_str(key.trim()) {
            Ok(tool) => {
                if result.insert(tool, path.clone()).is_some() {
                    tracing::warn!("tool {} given more than once, using {:?}", key, path);
                }
            }
            Err(_) => tracing::warn!(
                "tool {} is not supported, skipping {:?}; supported are: {}",
                key,
                path,
                Tool::iter().map(|tool| tool.to_string()).collect::<Vec<_>>().join(", ")
            ),
        }
    }
    result
}

/// Run the aggregation.
///
/// Tool outputs are parsed in catalog order, then all fusions are enriched
/// with the databases of `sources` and scored.  A failure to parse a tool's
/// output aborts the run, an unavailable database does not.
pub fn run(
    config: &RunConfig,
    sources: &[Box<dyn FusionSource>],
) -> Result<Aggregation, anyhow::Error> {
    let enabled = sources
        .iter()
        .map(|source| source.database())
        .unique()
        .collect::<Vec<_>>();
    config.weights.validate(&enabled)?;

    tracing::info!("parsing fusion tool outputs...");
    let before_parsing = Instant::now();
    let tool_files = resolve_tools(&config.tool_files);
    let mut registry = FusionRegistry::new();
    for tool in Tool::iter() {
        let path = match tool_files.get(&tool) {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => continue,
        };
        if !is_non_empty_file(path) {
            tracing::warn!(
                "{} output {:?} is missing or empty, skipping",
                tool.label(),
                path
            );
            continue;
        }
        registry.parse_file(tool, path, config.allow_multiple_gene_symbols)?;
    }
    tracing::info!(
        "... done parsing {} tool outputs with {} fusions in {:?}",
        registry.running_tools().len(),
        registry.len().separate_with_commas(),
        before_parsing.elapsed()
    );

    tracing::info!("loading reference databases...");
    let index = MembershipIndex::load(sources);
    tracing::info!("enriching and scoring fusions...");
    let aggregation = registry.into_scored(&index, &config.weights, config.detection_cutoff);
    tracing::info!(
        "... done, {} of {} fusions pass the detection cutoff of {} tools",
        aggregation.filtered().len().separate_with_commas(),
        aggregation.all().len().separate_with_commas(),
        aggregation.detection_cutoff()
    );

    Ok(aggregation)
}

/// Result of an aggregation run, all fusions enriched and scored.
#[derive(Debug, Clone, Serialize)]
pub struct Aggregation {
    fusions: Vec<Fusion>,
    running_tools: Vec<Tool>,
    enabled_databases: Vec<Database>,
    detection_cutoff: usize,
}

/// Counters describing an aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of fusions.
    pub detected: usize,
    /// Fusions with at least one database hit.
    pub known: usize,
    /// Fusions without database hits.
    pub unknown: usize,
    /// Fusions per running tool (sorted by key), plus `together` for the
    /// fusions found by all running tools.
    pub tool_detection: IndexMap<String, usize>,
    /// Element `k` is the number of fusions found by exactly `k` tools.
    pub distribution: Vec<usize>,
}

impl Aggregation {
    pub(crate) fn new(
        fusions: Vec<Fusion>,
        running_tools: Vec<Tool>,
        enabled_databases: Vec<Database>,
        detection_cutoff: usize,
    ) -> Self {
        Self {
            fusions,
            running_tools,
            enabled_databases,
            detection_cutoff,
        }
    }

    /// All fusions in order of first observation.
    pub fn all(&self) -> &[Fusion] {
        &self.fusions
    }

    /// Whether the detection cutoff can be satisfied by the running tools.
    pub fn is_filter_active(&self) -> bool {
        self.running_tools.len() >= self.detection_cutoff
    }

    /// Fusions detected by at least `detection_cutoff` tools; all fusions if
    /// fewer tools ran than the cutoff requires.
    pub fn filtered(&self) -> Vec<&Fusion> {
        let active = self.is_filter_active();
        self.fusions
            .iter()
            .filter(|fusion| !active || fusion.tool_count() >= self.detection_cutoff)
            .collect()
    }

    /// Tools whose output was parsed.
    pub fn running_tools(&self) -> &[Tool] {
        &self.running_tools
    }

    /// Running tools sorted by key.
    pub fn running_tools_sorted(&self) -> Vec<Tool> {
        let mut result = self.running_tools.clone();
        result.sort_by_key(|tool| tool.to_string());
        result
    }

    /// Databases used for enrichment and scoring.
    pub fn enabled_databases(&self) -> &[Database] {
        &self.enabled_databases
    }

    pub fn detection_cutoff(&self) -> usize {
        self.detection_cutoff
    }

    /// Compute the summary counters.
    pub fn summary(&self) -> Summary {
        let running_tools = self.running_tools_sorted();
        let mut tool_detection = running_tools
            .iter()
            .map(|tool| (tool.to_string(), 0))
            .collect::<IndexMap<_, _>>();
        let mut together = 0;
        let mut distribution = vec![0; running_tools.len() + 1];
        for fusion in &self.fusions {
            for tool in fusion.tools() {
                *tool_detection.entry(tool.to_string()).or_default() += 1;
            }
            if fusion.tool_count() == running_tools.len() {
                together += 1;
            }
            if fusion.tool_count() >= distribution.len() {
                distribution.resize(fusion.tool_count() + 1, 0);
            }
            distribution[fusion.tool_count()] += 1;
        }
        tool_detection.insert("together".to_owned(), together);

        let known = self
            .fusions
            .iter()
            .filter(|fusion| !fusion.database_hits().is_empty())
            .count();
        Summary {
            detected: self.fusions.len(),
            known,
            unknown: self.fusions.len() - known,
            tool_detection,
            distribution,
        }
    }
}
