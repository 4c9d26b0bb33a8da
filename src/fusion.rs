//! The `Fusion` entity: one detected gene fusion with its evidence.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::parsers::{Evidence, Tool};

/// Computed confidence score of a fusion.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, derive_new::new)]
pub struct Score {
    /// The score in `[0, 1]`, rounded to three decimals.
    pub value: f64,
    /// The arithmetic that produced `value`.
    pub explained: String,
}

/// One gene fusion, identified by its `GeneA--GeneB` name.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct Fusion {
    name: String,
    tool_evidence: IndexMap<Tool, Vec<Evidence>>,
    database_hits: IndexSet<Database>,
    score: Option<Score>,
}

impl Fusion {
    /// Create a new fusion with its first evidence record.
    pub(crate) fn new(name: String, tool: Tool, evidence: Evidence) -> Self {
        let mut result = Self {
            name,
            tool_evidence: IndexMap::new(),
            database_hits: IndexSet::new(),
            score: None,
        };
        result.add_tool(tool, evidence);
        result
    }

    /// The fusion name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evidence records by tool, in order of first detection.
    pub fn tool_evidence(&self) -> &IndexMap<Tool, Vec<Evidence>> {
        &self.tool_evidence
    }

    /// Tools that detected this fusion.
    pub fn tools(&self) -> impl Iterator<Item = Tool> + '_ {
        self.tool_evidence.keys().copied()
    }

    /// Number of distinct tools that detected this fusion.
    pub fn tool_count(&self) -> usize {
        self.tool_evidence.len()
    }

    /// Reference databases that know this fusion.
    pub fn database_hits(&self) -> &IndexSet<Database> {
        &self.database_hits
    }

    /// The score; `None` until the fusion has been scored.
    pub fn score(&self) -> Option<&Score> {
        self.score.as_ref()
    }

    /// Append one evidence record of `tool`.
    ///
    /// One tool may report the same gene pair on several lines, all are kept.
    pub(crate) fn add_tool(&mut self, tool: Tool, evidence: Evidence) {
        self.tool_evidence.entry(tool).or_default().push(evidence);
    }

    /// Record a hit in `database`; idempotent.
    pub(crate) fn add_db(&mut self, database: Database) {
        if !self.database_hits.insert(database) {
            tracing::trace!("database {} already recorded for {}", database, &self.name);
        }
    }

    pub(crate) fn set_score(&mut self, score: Score) {
        self.score = Some(score);
    }
}
