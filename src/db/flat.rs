//! Reference databases exported as flat, tab-separated files.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    time::Instant,
};

use serde::Deserialize;
use thousands::Separable;

use super::{normalize, Database, FusionSource};
use crate::common::open_read_maybe_gz;

/// Records of the database exports; column names are lower-cased before
/// deserialization.
pub mod input {
    use serde::Deserialize;

    /// One COSMIC fusion record, legacy or current export.
    #[derive(Debug, Deserialize)]
    pub struct CosmicRecord {
        #[serde(default)]
        pub translocation_name: Option<String>,
        #[serde(default)]
        pub five_prime_gene_symbol: Option<String>,
        #[serde(default)]
        pub three_prime_gene_symbol: Option<String>,
    }

    /// One Mitelman `molbiolclinassoc` record.
    #[derive(Debug, Deserialize)]
    pub struct MitelmanRecord {
        pub geneshort: String,
    }

    /// One FusionGDB fusion information record.
    #[derive(Debug, Deserialize)]
    pub struct FusionGdbRecord {
        pub h_gene: String,
        pub t_gene: String,
    }

    /// One FusionGDB2 record.
    #[derive(Debug, Deserialize)]
    pub struct FusionGdb2Record {
        pub fusions: String,
    }
}

/// A reference database read from a TSV export with header line.
#[derive(Debug, Clone)]
pub struct FlatFileSource {
    database: Database,
    path: PathBuf,
}

impl FlatFileSource {
    pub fn new<P: AsRef<Path>>(database: Database, path: P) -> Self {
        Self {
            database,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The source for `database` at its conventional location within `dir`.
    pub fn in_dir<P: AsRef<Path>>(database: Database, dir: P) -> Self {
        Self::new(database, dir.as_ref().join(database.file_name()))
    }
}

/// Deserialize all records of `reader` and normalize them with `normalize`.
fn collect<T, F>(
    reader: &mut csv::Reader<Box<dyn std::io::BufRead>>,
    normalize: F,
) -> Result<HashSet<String>, anyhow::Error>
where
    T: for<'de> Deserialize<'de>,
    F: Fn(T) -> Option<String>,
{
    let mut result = HashSet::new();
    for record in reader.deserialize() {
        let record: T = record?;
        if let Some(name) = normalize(record) {
            result.insert(name);
        }
    }
    Ok(result)
}

impl FusionSource for FlatFileSource {
    fn database(&self) -> Database {
        self.database
    }

    fn get_all_fusions(&self) -> Result<HashSet<String>, anyhow::Error> {
        tracing::debug!("reading {} fusions from {:?}", self.database, &self.path);
        let before_reading = Instant::now();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .from_reader(open_read_maybe_gz(&self.path).map_err(|e| {
                anyhow::anyhow!("could not open {:?} for reading: {}", &self.path, e)
            })?);
        let header = reader
            .headers()?
            .iter()
            .map(|name| name.trim().to_lowercase())
            .collect::<csv::StringRecord>();
        reader.set_headers(header);

        let result = match self.database {
            Database::Cosmic => collect(&mut reader, |record: input::CosmicRecord| {
                match (
                    record.translocation_name,
                    record.five_prime_gene_symbol,
                    record.three_prime_gene_symbol,
                ) {
                    (_, Some(five), Some(three)) => normalize::cosmic_partners(&five, &three),
                    (Some(name), _, _) => normalize::cosmic_translocation(&name),
                    _ => None,
                }
            }),
            Database::Mitelman => collect(&mut reader, |record: input::MitelmanRecord| {
                normalize::mitelman(&record.geneshort)
            }),
            Database::FusionGdb => collect(&mut reader, |record: input::FusionGdbRecord| {
                normalize::fusiongdb(&record.h_gene, &record.t_gene)
            }),
            Database::FusionGdb2 => collect(&mut reader, |record: input::FusionGdb2Record| {
                normalize::fusiongdb2(&record.fusions)
            }),
        }
        .map_err(|e| anyhow::anyhow!("problem reading {:?}: {}", &self.path, e))?;

        tracing::debug!(
            "read {} distinct {} fusions in {:?}",
            result.len().separate_with_commas(),
            self.database,
            before_reading.elapsed()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::FlatFileSource;
    use crate::db::{Database, FusionSource};

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[rstest]
    #[case(Database::Cosmic, &["BCR--ABL1", "ETV6--NTRK3", "FGFR3--TACC3"])]
    #[case(Database::Mitelman, &["BCR--ABL1", "TMPRSS2--ERG", "EML4--ALK"])]
    #[case(Database::FusionGdb, &["FGFR3--TACC3", "AKAP9--BRAF"])]
    #[case(Database::FusionGdb2, &["FGFR3--TACC3", "EML4--ALK", "KIAA1549--BRAF"])]
    fn get_all_fusions(
        #[case] database: Database,
        #[case] expected: &[&str],
    ) -> Result<(), anyhow::Error> {
        let source = FlatFileSource::in_dir(database, "tests/data/db");

        assert_eq!(source.database(), database);
        assert_eq!(source.get_all_fusions()?, set(expected));

        Ok(())
    }

    #[test]
    fn cosmic_current_export() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join("cosmic.tsv");
        std::fs::write(
            &path,
            "FIVE_PRIME_GENE_SYMBOL\tTHREE_PRIME_GENE_SYMBOL\n\
             ENST00000305877.12(BCR)\tENST00000318560.5(ABL1)\n\
             ENST00000332149.10(TMPRSS2)\tENST00000288319.12(ERG)\n",
        )?;

        let source = FlatFileSource::new(Database::Cosmic, &path);
        assert_eq!(
            source.get_all_fusions()?,
            set(&["BCR--ABL1", "TMPRSS2--ERG"])
        );

        Ok(())
    }

    #[test]
    fn missing_file() {
        let source = FlatFileSource::new(Database::Mitelman, "tests/data/db/missing.tsv");
        assert!(source.get_all_fusions().is_err());
    }
}
