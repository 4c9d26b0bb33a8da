//! Common, IO-related code.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use flate2::{bufread::MultiGzDecoder, write::GzEncoder, Compression};

/// Transparently open a file with gzip decoder.
pub fn open_read_maybe_gz<P>(path: P) -> Result<Box<dyn BufRead>, anyhow::Error>
where
    P: AsRef<Path>,
{
    if path.as_ref().extension().map(|s| s.to_str()) == Some(Some("gz")) {
        tracing::trace!("Opening {:?} as gzip for reading", path.as_ref());
        let file = File::open(path)?;
        let bufreader = BufReader::new(file);
        let decoder = MultiGzDecoder::new(bufreader);
        Ok(Box::new(BufReader::new(decoder)))
    } else {
        tracing::trace!("Opening {:?} as plain text for reading", path.as_ref());
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Transparently open a file with gzip encoder.
pub fn open_write_maybe_gz<P>(path: P) -> Result<Box<dyn Write>, anyhow::Error>
where
    P: AsRef<Path>,
{
    if path.as_ref().extension().map(|s| s.to_str()) == Some(Some("gz")) {
        tracing::trace!("Opening {:?} as gzip for writing", path.as_ref());
        let file = File::create(path)?;
        let bufwriter = BufWriter::new(file);
        let encoder = GzEncoder::new(bufwriter, Compression::default());
        Ok(Box::new(encoder))
    } else {
        tracing::trace!("Opening {:?} as plain text for writing", path.as_ref());
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// Returns an iterator over the lines of the (possibly gzip-compressed) file.
pub fn read_lines<P>(path: P) -> Result<std::io::Lines<Box<dyn BufRead>>, anyhow::Error>
where
    P: AsRef<Path>,
{
    Ok(open_read_maybe_gz(path)?.lines())
}

/// Whether `path` points to an existing file with non-zero size.
pub fn is_non_empty_file<P>(path: P) -> bool
where
    P: AsRef<Path>,
{
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod test {
    use std::io::Write;

    #[rstest::rstest]
    #[case(true)]
    #[case(false)]
    fn write_then_read_lines(#[case] is_gzip: bool) -> Result<(), anyhow::Error> {
        let filename = if is_gzip { "test.txt.gz" } else { "test.txt" };
        let tmp_dir = temp_testdir::TempDir::default();

        {
            let mut f = super::open_write_maybe_gz(tmp_dir.join(filename))?;
            f.write_all(b"FGFR3--TACC3\nAKAP9--BRAF\n")?;
            f.flush()?;
        }

        let lines = super::read_lines(tmp_dir.join(filename))?.collect::<Result<Vec<_>, _>>()?;
        assert_eq!(lines, vec!["FGFR3--TACC3", "AKAP9--BRAF"]);

        Ok(())
    }

    #[test]
    fn is_non_empty_file() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        std::fs::write(tmp_dir.join("empty.tsv"), "")?;
        std::fs::write(tmp_dir.join("full.tsv"), "x\n")?;

        assert!(!super::is_non_empty_file(tmp_dir.join("empty.tsv")));
        assert!(super::is_non_empty_file(tmp_dir.join("full.tsv")));
        assert!(!super::is_non_empty_file(tmp_dir.join("missing.tsv")));
        assert!(!super::is_non_empty_file(&*tmp_dir));

        Ok(())
    }
}
