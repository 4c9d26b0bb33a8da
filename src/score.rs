//! Weighted scoring of fusions from tool detections and database hits.

use std::path::Path;

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use crate::common::open_read_maybe_gz;
use crate::db::Database;
use crate::fusion::{Fusion, Score};
use crate::parsers::Tool;

/// Slack for comparing sums of weights against their maximum.
const EPSILON: f64 = 1e-9;

/// Tool and database weights used for scoring.
///
/// Tool weights are percentages, database weights are fractions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Weights {
    /// Weight per tool in percent.
    pub tools: IndexMap<Tool, f64>,
    /// Weight per reference database.
    pub databases: IndexMap<Database, f64>,
}

impl Default for Weights {
    fn default() -> Self {
        let tool_count = Tool::iter().count() as f64;
        Self {
            tools: Tool::iter().map(|tool| (tool, 100.0 / tool_count)).collect(),
            databases: Database::iter()
                .map(|database| {
                    let weight = match database {
                        Database::Cosmic => 0.40,
                        Database::Mitelman => 0.40,
                        Database::FusionGdb => 0.20,
                        Database::FusionGdb2 => 0.20,
                    };
                    (database, weight)
                })
                .collect(),
        }
    }
}

/// Partial weights as read from a JSON file; missing entries keep defaults.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct WeightsOverrides {
    tools: IndexMap<Tool, f64>,
    databases: IndexMap<Database, f64>,
}

impl Weights {
    /// Default weights with the overrides of the JSON file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let reader = open_read_maybe_gz(path.as_ref()).map_err(|e| {
            anyhow::anyhow!("could not open weights file {:?}: {}", path.as_ref(), e)
        })?;
        let overrides: WeightsOverrides = serde_json::from_reader(reader).map_err(|e| {
            anyhow::anyhow!("could not parse weights file {:?}: {}", path.as_ref(), e)
        })?;

        let mut result = Self::default();
        result.tools.extend(overrides.tools);
        result.databases.extend(overrides.databases);
        Ok(result)
    }

    /// Weight of `tool` in percent.
    pub fn tool(&self, tool: Tool) -> f64 {
        self.tools.get(&tool).copied().unwrap_or_default()
    }

    /// Weight of `database`.
    pub fn database(&self, database: Database) -> f64 {
        self.databases.get(&database).copied().unwrap_or_default()
    }

    /// Sum of the weights of the `enabled` databases.
    pub fn enabled_total(&self, enabled: &[Database]) -> f64 {
        enabled.iter().map(|database| self.database(*database)).sum()
    }

    /// Check that weights are non-negative and within their budgets.
    pub fn validate(&self, enabled: &[Database]) -> Result<(), anyhow::Error> {
        if let Some((tool, weight)) = self
            .tools
            .iter()
            .find(|(_, weight)| !weight.is_finite() || **weight < 0.0)
        {
            anyhow::bail!("invalid weight {} for tool {}", weight, tool);
        }
        if let Some((database, weight)) = self
            .databases
            .iter()
            .find(|(_, weight)| !weight.is_finite() || **weight < 0.0)
        {
            anyhow::bail!("invalid weight {} for database {}", weight, database);
        }

        let tools_total: f64 = self.tools.values().sum();
        if tools_total > 100.0 + EPSILON {
            anyhow::bail!(
                "tool weights sum up to {:.3}, must not exceed 100",
                tools_total
            );
        }
        let databases_total = self.enabled_total(enabled);
        if databases_total > 1.0 + EPSILON {
            anyhow::bail!(
                "weights of enabled databases ({}) sum up to {:.3}, must not exceed 1",
                enabled.iter().join(", "),
                databases_total
            );
        }

        Ok(())
    }
}

/// Round to three decimals.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Render summands, `0.000` for an empty sum.
fn render_terms(terms: &[f64]) -> String {
    if terms.is_empty() {
        format!("{:.3}", 0.0)
    } else {
        terms.iter().map(|term| format!("{:.3}", term)).join(" + ")
    }
}

/// Compute the score of `fusion` with its explanation.
///
/// The tool part sums the percentage weights of the detecting tools.  The
/// database part sums the weights of the hit databases relative to the total
/// weight of the `enabled` databases.  Both parts count half.
pub fn score(fusion: &Fusion, weights: &Weights, enabled: &[Database]) -> Score {
    let tool_terms = fusion
        .tools()
        .sorted()
        .map(|tool| weights.tool(tool) / 100.0)
        .collect::<Vec<_>>();
    let db_terms = enabled
        .iter()
        .filter(|database| fusion.database_hits().contains(*database))
        .map(|database| weights.database(*database))
        .collect::<Vec<_>>();

    let tool_contribution: f64 = tool_terms.iter().sum();
    let enabled_total = weights.enabled_total(enabled);
    let (db_contribution, db_explained) = if enabled_total > 0.0 {
        (
            db_terms.iter().sum::<f64>() / enabled_total,
            format!(
                "0.5 * ({}) / {:.3}",
                render_terms(&db_terms),
                enabled_total
            ),
        )
    } else {
        (0.0, format!("0.5 * ({})", render_terms(&[])))
    };

    Score::new(
        round3(0.5 * tool_contribution + 0.5 * db_contribution),
        format!("0.5 * ({}) + {}", render_terms(&tool_terms), db_explained),
    )
}
