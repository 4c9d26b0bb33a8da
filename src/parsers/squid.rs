//! Parsing of annotated Squid `*_annotated.txt` output.

use super::{evidence, FusionCall, Line, LineParser, Value, FUSION_SEPARATOR};
use crate::common::{position, strip_chr};
use crate::err::ParseError;

/// Squid output parser.
///
/// Lines with `Type` equal to `non-fusion-gene` yield no calls.  The
/// `FusedGenes` column may list several comma-separated `A:B` pairs, each of
/// which becomes one call with the same evidence.
#[derive(Debug, Default, Clone, Copy)]
pub struct Squid;

/// Value of `Type` for rearrangements that do not fuse two genes.
const NON_FUSION_GENE: &str = "non-fusion-gene";

/// Interval breakpoint `chrom:start-end:strand`.
fn interval_breakpoint(chrom: &str, start: &str, end: &str, strand: &str) -> String {
    format!("{}:{}-{}:{}", strip_chr(chrom), start, end, strand)
}

impl LineParser for Squid {
    fn parse_line(&self, line: &Line) -> Result<Vec<FusionCall>, ParseError> {
        if line.get("Type")? == NON_FUSION_GENE {
            return Ok(Vec::new());
        }

        let strand1 = line.get("strand1")?;
        let left = interval_breakpoint(
            line.get("# chrom1")?,
            line.get("start1")?,
            line.get("end1")?,
            strand1,
        );
        let right = interval_breakpoint(
            line.get("chrom2")?,
            line.get("start2")?,
            line.get("end2")?,
            line.get("strand2")?,
        );
        // The partner on the "+" strand goes first.
        let position = if strand1 == "+" {
            position(&left, &right)
        } else {
            position(&right, &left)
        };
        let details = evidence([
            ("position", Value::Text(position)),
            ("score", line.int("score")?),
        ]);

        Ok(line
            .get("FusedGenes")?
            .split(',')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .map(|pair| FusionCall::new(pair.replace(':', FUSION_SEPARATOR), details.clone()))
            .collect())
    }
}
