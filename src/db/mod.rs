//! Reference databases of known fusions and enrichment of the registry.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;
use thousands::Separable;

use crate::registry::FusionRegistry;

pub mod flat;
pub mod normalize;

/// Enumeration of the supported reference databases.
#[derive(
    Serialize,
    Deserialize,
    EnumIter,
    clap::ValueEnum,
    strum::Display,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Copy,
)]
#[value(rename_all = "lower")]
pub enum Database {
    /// COSMIC fusion export
    #[serde(rename = "COSMIC")]
    #[strum(serialize = "COSMIC")]
    Cosmic,
    /// Mitelman database of chromosome aberrations and gene fusions
    Mitelman,
    /// FusionGDB
    #[serde(rename = "FusionGDB")]
    #[strum(serialize = "FusionGDB")]
    FusionGdb,
    /// FusionGDB 2.0
    #[serde(rename = "FusionGDB2")]
    #[strum(serialize = "FusionGDB2")]
    FusionGdb2,
}

impl Database {
    /// Databases used when the user does not select any.
    pub const DEFAULT_ENABLED: [Database; 3] =
        [Database::Cosmic, Database::Mitelman, Database::FusionGdb2];

    /// Lower-case key of the database.
    pub fn key(&self) -> &'static str {
        match self {
            Database::Cosmic => "cosmic",
            Database::Mitelman => "mitelman",
            Database::FusionGdb => "fusiongdb",
            Database::FusionGdb2 => "fusiongdb2",
        }
    }

    /// File name of the database's export within the database directory.
    pub fn file_name(&self) -> String {
        format!("{}.tsv", self.key())
    }
}

/// A source of the fusion names known to one reference database.
pub trait FusionSource {
    /// The database this source provides.
    fn database(&self) -> Database;

    /// All normalized `GeneA--GeneB` names known to the database.
    fn get_all_fusions(&self) -> Result<HashSet<String>, anyhow::Error>;
}

/// Fusion names of one database, kept in memory.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    database: Database,
    fusions: HashSet<String>,
}

impl InMemorySource {
    pub fn new<I, S>(database: Database, fusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            database,
            fusions: fusions.into_iter().map(Into::into).collect(),
        }
    }
}

impl FusionSource for InMemorySource {
    fn database(&self) -> Database {
        self.database
    }

    fn get_all_fusions(&self) -> Result<HashSet<String>, anyhow::Error> {
        Ok(self.fusions.clone())
    }
}

/// Membership sets of all enabled databases.
///
/// Loaded once before enrichment; a database whose source fails contributes
/// an empty set but stays enabled.
#[derive(Debug, Clone, Default)]
pub struct MembershipIndex {
    sets: IndexMap<Database, HashSet<String>>,
}

impl MembershipIndex {
    /// Query every source once.
    pub fn load(sources: &[Box<dyn FusionSource>]) -> Self {
        let mut sets = IndexMap::new();
        for source in sources {
            let database = source.database();
            let fusions = match source.get_all_fusions() {
                Ok(fusions) => fusions,
                Err(e) => {
                    tracing::warn!(
                        "database {} is unavailable and contributes no hits: {}",
                        database,
                        e
                    );
                    HashSet::new()
                }
            };
            tracing::debug!(
                "database {} knows {} fusions",
                database,
                fusions.len().separate_with_commas()
            );
            sets.entry(database)
                .or_insert_with(HashSet::new)
                .extend(fusions);
        }
        Self { sets }
    }

    /// The enabled databases, in load order.
    pub fn enabled(&self) -> Vec<Database> {
        self.sets.keys().copied().collect()
    }

    /// Whether `database` knows the fusion `name`.
    pub fn contains(&self, database: Database, name: &str) -> bool {
        self.sets
            .get(&database)
            .map(|set| set.contains(name))
            .unwrap_or(false)
    }

    /// Record the database hits of every fusion in the registry.
    pub fn enrich(&self, registry: &mut FusionRegistry) {
        let mut hits = 0usize;
        for fusion in registry.fusions_mut() {
            for database in self.sets.keys() {
                if self.contains(*database, fusion.name()) {
                    fusion.add_db(*database);
                    hits += 1;
                }
            }
        }
        tracing::debug!(
            "found {} database hits for {} fusions",
            hits.separate_with_commas(),
            registry.len().separate_with_commas()
        );
    }
}
