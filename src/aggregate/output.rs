//! Export of aggregation results to JSON, CSV and fusion list files.

use std::{io::Write, path::Path};

use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;

use super::Aggregation;
use crate::common::open_write_maybe_gz;
use crate::db::Database;
use crate::fusion::Fusion;
use crate::parsers::{Evidence, Tool};

/// Supported export formats.
#[derive(
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
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    /// All fusions with their evidence as JSON array.
    Json,
    /// One row per fusion, one column per running tool.
    Csv,
}

/// One fusion in the JSON export.
#[derive(Serialize, Debug)]
struct JsonRecord<'a> {
    name: &'a str,
    databases: Vec<Database>,
    score: Option<f64>,
    score_explained: Option<&'a str>,
    tools: &'a IndexMap<Tool, Vec<Evidence>>,
}

impl<'a> From<&'a Fusion> for JsonRecord<'a> {
    fn from(fusion: &'a Fusion) -> Self {
        Self {
            name: fusion.name(),
            databases: fusion.database_hits().iter().copied().collect(),
            score: fusion.score().map(|score| score.value),
            score_explained: fusion.score().map(|score| score.explained.as_str()),
            tools: fusion.tool_evidence(),
        }
    }
}

fn open_writer(path: &Path) -> Result<Box<dyn Write>, anyhow::Error> {
    open_write_maybe_gz(path)
        .map_err(|e| anyhow::anyhow!("could not open {:?} for writing: {}", path, e))
}

/// Write all fusions as a JSON array.
pub fn write_json<P: AsRef<Path>>(path: P, aggregation: &Aggregation) -> Result<(), anyhow::Error> {
    tracing::debug!("writing JSON to {:?}", path.as_ref());
    let mut writer = open_writer(path.as_ref())?;
    let records = aggregation
        .all()
        .iter()
        .map(JsonRecord::from)
        .collect::<Vec<_>>();
    serde_json::to_writer(&mut writer, &records)?;
    writer.flush()?;
    Ok(())
}

/// Render the evidence records of one tool into one CSV cell.
fn evidence_cell(records: &[Evidence]) -> String {
    records
        .iter()
        .map(|record| {
            record
                .iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .join(",")
        })
        .join("|")
}

/// Write all fusions as CSV with one column per running tool.
pub fn write_csv<P: AsRef<Path>>(path: P, aggregation: &Aggregation) -> Result<(), anyhow::Error> {
    tracing::debug!("writing CSV to {:?}", path.as_ref());
    let running_tools = aggregation.running_tools_sorted();
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .from_writer(open_writer(path.as_ref())?);

    let mut header = vec![
        "Fusion".to_owned(),
        "Databases".to_owned(),
        "Score".to_owned(),
        "Explained score".to_owned(),
    ];
    header.extend(running_tools.iter().map(|tool| tool.to_string()));
    writer.write_record(&header)?;

    for fusion in aggregation.all() {
        let mut row = vec![
            fusion.name().to_owned(),
            fusion.database_hits().iter().join(","),
            fusion
                .score()
                .map(|score| format!("{:.3}", score.value))
                .unwrap_or_default(),
            fusion
                .score()
                .map(|score| score.explained.clone())
                .unwrap_or_default(),
        ];
        row.extend(running_tools.iter().map(|tool| {
            fusion
                .tool_evidence()
                .get(tool)
                .map(|records| evidence_cell(records))
                .unwrap_or_default()
        }));
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_names<'a, I>(path: &Path, fusions: I) -> Result<(), anyhow::Error>
where
    I: IntoIterator<Item = &'a Fusion>,
{
    let mut writer = open_writer(path)?;
    for fusion in fusions {
        writeln!(writer, "{}", fusion.name())?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the summary counters as JSON.
pub fn write_summary<P: AsRef<Path>>(
    path: P,
    aggregation: &Aggregation,
) -> Result<(), anyhow::Error> {
    let mut writer = open_writer(path.as_ref())?;
    serde_json::to_writer_pretty(&mut writer, &aggregation.summary())?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write all exports to `dir`.
///
/// File names get a `.gz` suffix and gzip compression with `compress`.
pub fn write_all<P: AsRef<Path>>(
    dir: P,
    aggregation: &Aggregation,
    formats: &[ExportFormat],
    compress: bool,
) -> Result<(), anyhow::Error> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)
        .map_err(|e| anyhow::anyhow!("could not create output directory {:?}: {}", dir, e))?;
    let file_name = |name: &str| {
        if compress {
            dir.join(format!("{}.gz", name))
        } else {
            dir.join(name)
        }
    };

    for format in formats.iter().sorted().dedup() {
        let path = file_name(&format!("fusions.{}", format));
        match format {
            ExportFormat::Json => write_json(&path, aggregation)?,
            ExportFormat::Csv => write_csv(&path, aggregation)?,
        }
    }
    write_names(&file_name("fusion_list.tsv"), aggregation.all())?;
    write_names(
        &file_name("fusion_list_filtered.tsv"),
        aggregation.filtered(),
    )?;
    write_summary(file_name("summary.json"), aggregation)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use std::io::Read;

    use pretty_assertions::assert_eq;

    use super::{write_all, ExportFormat};
    use crate::aggregate::Aggregation;
    use crate::db::{Database, FusionSource, InMemorySource, MembershipIndex};
    use crate::parsers::{evidence, Tool, Value};
    use crate::registry::FusionRegistry;
    use crate::score::Weights;

    fn aggregation() -> Aggregation {
        let mut registry = FusionRegistry::new();
        registry.mark_running(Tool::Starfusion);
        registry.mark_running(Tool::Arriba);
        registry.add(
            "BCR--ABL1",
            Tool::Starfusion,
            evidence([
                ("position", Value::Text("22:23632600:+#9:133729451:+".into())),
                ("junction_reads", Value::Int(39)),
            ]),
        );
        registry.add(
            "BCR--ABL1",
            Tool::Arriba,
            evidence([("split_reads1", Value::Int(70))]),
        );
        registry.add(
            "BCR--ABL1",
            Tool::Arriba,
            evidence([("split_reads1", Value::Int(5))]),
        );
        registry.add(
            "NOVEL--GENE",
            Tool::Arriba,
            evidence([("confidence", Value::Text("low".into()))]),
        );

        let sources: Vec<Box<dyn FusionSource>> = vec![
            Box::new(InMemorySource::new(Database::Cosmic, ["BCR--ABL1"])),
            Box::new(InMemorySource::new(Database::Mitelman, ["BCR--ABL1"])),
        ];
        registry.into_scored(&MembershipIndex::load(&sources), &Weights::default(), 2)
    }

    #[test]
    fn write_csv_and_lists() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        write_all(&*tmp_dir, &aggregation(), &[ExportFormat::Csv], false)?;

        assert_eq!(
            std::fs::read_to_string(tmp_dir.join("fusions.csv"))?,
            "Fusion,Databases,Score,Explained score,arriba,starfusion\n\
             BCR--ABL1,\"COSMIC,Mitelman\",0.600,0.5 * (0.100 + 0.100) + 0.5 * (0.400 + 0.400) / 0.800,\
             split_reads1: 70|split_reads1: 5,\"position: 22:23632600:+#9:133729451:+,junction_reads: 39\"\n\
             NOVEL--GENE,,0.050,0.5 * (0.100) + 0.5 * (0.000) / 0.800,confidence: low,\n"
        );
        assert_eq!(
            std::fs::read_to_string(tmp_dir.join("fusion_list.tsv"))?,
            "BCR--ABL1\nNOVEL--GENE\n"
        );
        assert_eq!(
            std::fs::read_to_string(tmp_dir.join("fusion_list_filtered.tsv"))?,
            "BCR--ABL1\n"
        );
        assert!(!tmp_dir.join("fusions.json").exists());

        let summary: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(tmp_dir.join("summary.json"))?)?;
        assert_eq!(summary["known"], 1);
        assert_eq!(summary["tool_detection"]["together"], 1);

        Ok(())
    }

    #[test]
    fn write_json_compressed() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        write_all(&*tmp_dir, &aggregation(), &[ExportFormat::Json], true)?;

        let mut contents = String::new();
        flate2::read::GzDecoder::new(std::fs::File::open(tmp_dir.join("fusions.json.gz"))?)
            .read_to_string(&mut contents)?;
        let records: serde_json::Value = serde_json::from_str(&contents)?;

        assert_eq!(records[0]["name"], "BCR--ABL1");
        assert_eq!(
            records[0]["databases"],
            serde_json::json!(["COSMIC", "Mitelman"])
        );
        assert_eq!(records[0]["score"], 0.6);
        assert_eq!(
            records[0]["tools"]["arriba"],
            serde_json::json!([{"split_reads1": 70}, {"split_reads1": 5}])
        );
        assert_eq!(records[1]["score_explained"], "0.5 * (0.100) + 0.5 * (0.000) / 0.800");
        assert!(tmp_dir.join("fusion_list_filtered.tsv.gz").exists());

        Ok(())
    }
}
