//! Registry of fusions, merged by name across all tools.

use std::{path::Path, time::Instant};

use indexmap::{IndexMap, IndexSet};
use thousands::Separable;

use crate::aggregate::Aggregation;
use crate::common::read_lines;
use crate::db::MembershipIndex;
use crate::fusion::Fusion;
use crate::parsers::{Evidence, FusionCall, Tool};
use crate::score::{score, Weights};

/// In-memory store of `Fusion` entities keyed by their name.
///
/// Fusions keep the order of their first observation.
#[derive(Debug, Default, Clone)]
pub struct FusionRegistry {
    /// Fusions by name.
    pub(crate) fusions: IndexMap<String, Fusion>,
    /// Tools whose output is being or has been parsed.
    pub(crate) running_tools: IndexSet<Tool>,
}

impl FusionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tool` as running, regardless of how many fusions it yields.
    pub fn mark_running(&mut self, tool: Tool) {
        self.running_tools.insert(tool);
    }

    /// Add evidence of `tool` for the fusion `name`.
    ///
    /// No-op for an empty name.  The name is matched exactly, gene order and
    /// separator included.
    pub fn add(&mut self, name: &str, tool: Tool, evidence: Evidence) {
        if name.is_empty() {
            return;
        }
        match self.index_by(name) {
            Some(index) => self.fusions[index].add_tool(tool, evidence),
            None => {
                self.fusions.insert(
                    name.to_owned(),
                    Fusion::new(name.to_owned(), tool, evidence),
                );
            }
        }
    }

    /// Add all calls of one parsed line.
    pub fn add_calls(&mut self, tool: Tool, calls: Vec<FusionCall>) {
        for call in calls {
            self.add(&call.name, tool, call.evidence);
        }
    }

    /// Parse the output file of `tool` and merge all its calls.
    ///
    /// The tool counts as running even if the file yields no fusion.  With
    /// `allow_multiple_gene_symbols` unset, only the first call of a line is
    /// kept.  Returns the number of merged calls.
    pub fn parse_file<P: AsRef<Path>>(
        &mut self,
        tool: Tool,
        path: P,
        allow_multiple_gene_symbols: bool,
    ) -> Result<usize, anyhow::Error> {
        let path = path.as_ref();
        tracing::debug!("parsing {} output {:?}", tool.label(), path);
        let before_parsing = Instant::now();
        self.mark_running(tool);

        let delimiter = tool.delimiter();
        let mut parser = tool.parser();
        let mut lines = read_lines(path).map_err(|e| {
            anyhow::anyhow!("could not open {} output {:?}: {}", tool.label(), path, e)
        })?;
        let header = lines
            .next()
            .transpose()
            .map_err(|e| anyhow::anyhow!("could not read {} output {:?}: {}", tool.label(), path, e))?
            .ok_or_else(|| anyhow::anyhow!("{} output {:?} has no header", tool.label(), path))?;
        parser.set_header(&header, delimiter);

        let mut count_calls = 0;
        for (index, line) in lines.enumerate() {
            let line = line.map_err(|e| {
                anyhow::anyhow!("could not read {} output {:?}: {}", tool.label(), path, e)
            })?;
            if line.trim().is_empty() {
                continue;
            }
            let mut calls = parser.parse(&line, delimiter).map_err(|e| {
                anyhow::anyhow!(
                    "problem parsing line {} of {} output {:?}: {}",
                    index + 2,
                    tool.label(),
                    path,
                    e
                )
            })?;
            if !allow_multiple_gene_symbols {
                calls.truncate(1);
            }
            calls.retain(|call| !call.name.is_empty());
            count_calls += calls.len();
            self.add_calls(tool, calls);
        }

        tracing::debug!(
            "merged {} calls of {} in {:?}, registry has {} fusions",
            count_calls.separate_with_commas(),
            tool.label(),
            before_parsing.elapsed(),
            self.len().separate_with_commas()
        );
        Ok(count_calls)
    }

    /// Enrich all fusions from `index`, then score them.
    ///
    /// Consumes the registry so that nothing can be merged after scoring.
    pub fn into_scored(
        mut self,
        index: &MembershipIndex,
        weights: &Weights,
        detection_cutoff: usize,
    ) -> Aggregation {
        index.enrich(&mut self);
        let enabled = index.enabled();
        let fusions = self
            .fusions
            .into_values()
            .map(|mut fusion| {
                let result = score(&fusion, weights, &enabled);
                fusion.set_score(result);
                fusion
            })
            .collect();

        Aggregation::new(
            fusions,
            self.running_tools.into_iter().collect(),
            enabled,
            detection_cutoff,
        )
    }

    /// Index of the fusion with the given name, if any.
    pub fn index_by(&self, name: &str) -> Option<usize> {
        self.fusions.get_index_of(name)
    }

    /// Fusion with the given name, if any.
    pub fn get(&self, name: &str) -> Option<&Fusion> {
        self.fusions.get(name)
    }

    /// All fusions in order of first observation.
    pub fn fusions(&self) -> impl Iterator<Item = &Fusion> {
        self.fusions.values()
    }

    pub(crate) fn fusions_mut(&mut self) -> impl Iterator<Item = &mut Fusion> {
        self.fusions.values_mut()
    }

    /// Number of fusions.
    pub fn len(&self) -> usize {
        self.fusions.len()
    }

    /// Whether no fusion has been registered.
    pub fn is_empty(&self) -> bool {
        self.fusions.is_empty()
    }

    /// Tools that were executed, in order of registration.
    pub fn running_tools(&self) -> &IndexSet<Tool> {
        &self.running_tools
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::FusionRegistry;
    use crate::db::{Database, FusionSource, InMemorySource, MembershipIndex};
    use crate::parsers::{evidence, Tool, Value};
    use crate::score::Weights;

    #[test]
    fn add_merges_by_exact_name() {
        let mut registry = FusionRegistry::new();
        registry.add("FGFR3--TACC3", Tool::Fusioncatcher, evidence([]));
        registry.add("AKAP9--BRAF", Tool::Ericscript, evidence([]));
        registry.add(
            "FGFR3--TACC3",
            Tool::Ericscript,
            evidence([("junction_reads", Value::Int(3))]),
        );
        // reverse gene order is a different fusion
        registry.add("TACC3--FGFR3", Tool::Ericscript, evidence([]));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.index_by("FGFR3--TACC3"), Some(0));
        assert_eq!(registry.index_by("AKAP9--BRAF"), Some(1));
        assert_eq!(registry.index_by("TACC3--FGFR3"), Some(2));
        assert_eq!(registry.index_by("FGFR3-TACC3"), None);

        let fusion = registry.get("FGFR3--TACC3").unwrap();
        assert_eq!(
            fusion.tools().collect::<Vec<_>>(),
            vec![Tool::Fusioncatcher, Tool::Ericscript]
        );
    }

    #[test]
    fn add_ignores_empty_name() {
        let mut registry = FusionRegistry::new();
        registry.add("", Tool::Squid, evidence([]));

        assert!(registry.is_empty());
    }

    #[test]
    fn every_fusion_has_evidence() {
        let mut registry = FusionRegistry::new();
        for (name, tool) in [
            ("A--B", Tool::Arriba),
            ("C--D", Tool::Pizzly),
            ("A--B", Tool::Pizzly),
        ] {
            registry.add(name, tool, evidence([]));
        }

        assert!(registry.fusions().all(|fusion| fusion.tool_count() >= 1));
    }

    #[test]
    fn running_tools() {
        let mut registry = FusionRegistry::new();
        registry.mark_running(Tool::Squid);
        registry.mark_running(Tool::Arriba);
        registry.mark_running(Tool::Squid);

        assert_eq!(
            registry.running_tools().iter().copied().collect::<Vec<_>>(),
            vec![Tool::Squid, Tool::Arriba]
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn parse_and_merge_two_tools() -> Result<(), anyhow::Error> {
        let mut registry = FusionRegistry::new();
        let fusioncatcher =
            registry.parse_file(Tool::Fusioncatcher, "tests/data/fusioncatcher.txt", true)?;
        let ericscript = registry.parse_file(Tool::Ericscript, "tests/data/ericscript.tsv", true)?;

        assert_eq!(fusioncatcher, 18);
        assert_eq!(ericscript, 12);
        assert_eq!(registry.len(), 17 + 12 - 1);
        assert_eq!(registry.index_by("FGFR3--TACC3"), Some(0));

        let fusion = registry.get("FGFR3--TACC3").unwrap();
        assert_eq!(fusion.tool_evidence()[&Tool::Fusioncatcher].len(), 2);
        assert_eq!(fusion.tool_evidence()[&Tool::Ericscript].len(), 1);
        assert_eq!(
            registry.get("AKAP9--BRAF").unwrap().tools().collect::<Vec<_>>(),
            vec![Tool::Ericscript]
        );
        assert!(registry.fusions().all(|fusion| fusion.tool_count() >= 1));

        Ok(())
    }

    #[rstest::rstest]
    #[case(true, 3)]
    #[case(false, 2)]
    fn parse_multiple_gene_symbols(
        #[case] allow_multiple_gene_symbols: bool,
        #[case] expected: usize,
    ) -> Result<(), anyhow::Error> {
        let mut registry = FusionRegistry::new();
        registry.parse_file(Tool::Arriba, "tests/data/arriba.tsv", allow_multiple_gene_symbols)?;

        assert_eq!(registry.len(), expected);
        assert_eq!(registry.index_by("BCR--ABL1"), Some(0));

        Ok(())
    }

    #[test]
    fn parse_skips_filtered_records() -> Result<(), anyhow::Error> {
        let mut registry = FusionRegistry::new();
        registry.parse_file(Tool::Squid, "tests/data/squid.txt", true)?;

        assert_eq!(
            registry.fusions().map(|fusion| fusion.name()).collect::<Vec<_>>(),
            vec!["FGFR3--TACC3", "ETV6--NTRK3", "TMPRSS2--ERG", "TMPRSS2--ERG-AS1"]
        );
        assert_eq!(
            registry.running_tools().iter().copied().collect::<Vec<_>>(),
            vec![Tool::Squid]
        );

        Ok(())
    }

    #[test]
    fn parse_error_is_fatal() {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join("pizzly.tsv");
        std::fs::write(
            &path,
            "geneA.name\tgeneA.id\tgeneB.name\tgeneB.id\tpaircount\tsplitcount\n\
             AKAP9\tENSG00000127914\tBRAF\tENSG00000157764\tseven\t3\n",
        )
        .unwrap();

        let mut registry = FusionRegistry::new();
        let err = registry
            .parse_file(Tool::Pizzly, &path, true)
            .unwrap_err()
            .to_string();

        assert!(err.contains("line 2 of Pizzly output"), "{}", err);
        assert!(err.contains("paircount"), "{}", err);
    }

    #[test]
    fn into_scored() {
        let mut registry = FusionRegistry::new();
        registry.add("BCR--ABL1", Tool::Arriba, evidence([]));
        registry.add("BCR--ABL1", Tool::Starfusion, evidence([]));
        registry.add("NOVEL--GENE", Tool::Arriba, evidence([]));
        registry.mark_running(Tool::Arriba);
        registry.mark_running(Tool::Starfusion);

        let sources: Vec<Box<dyn FusionSource>> = vec![Box::new(InMemorySource::new(
            Database::Mitelman,
            ["BCR--ABL1"],
        ))];
        let aggregation = registry.into_scored(
            &MembershipIndex::load(&sources),
            &Weights::default(),
            2,
        );

        let scores = aggregation
            .all()
            .iter()
            .map(|fusion| (fusion.name(), fusion.score().unwrap().value))
            .collect::<Vec<_>>();
        assert_eq!(scores, vec![("BCR--ABL1", 0.6), ("NOVEL--GENE", 0.05)]);
        assert_eq!(aggregation.enabled_databases(), &[Database::Mitelman]);
    }
}
