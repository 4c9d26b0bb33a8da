//! Parsing of Arriba `fusions.tsv` output.
//!
//! Arriba reports intergenic breakpoints with the closest genes as
//! comma-separated candidates, each with its distance in parentheses,
//! e.g. `LINC01234(12345),GENE2(678)`.  Every combination of left and
//! right candidates yields one fusion call.

use itertools::{iproduct, Itertools};

use super::{evidence, fusion_name, FusionCall, Line, LineParser, Value};
use crate::common::{position, strip_chr_breakpoint};
use crate::err::ParseError;

/// Arriba output parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct Arriba;

/// Gene symbol candidates of one fusion partner, distance annotation removed.
fn gene_candidates(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(|gene| gene.split('(').next().unwrap_or_default().trim())
        .filter(|gene| !gene.is_empty())
        .unique()
        .collect()
}

/// Breakpoint `chrom:pos:strand` with the fusion strand of `strand(gene/fusion)`.
fn arriba_breakpoint(breakpoint: &str, strands: &str) -> String {
    let strand = strands.rsplit('/').next().unwrap_or(strands);
    format!("{}:{}", strip_chr_breakpoint(breakpoint), strand)
}

impl LineParser for Arriba {
    fn parse_line(&self, line: &Line) -> Result<Vec<FusionCall>, ParseError> {
        let left = arriba_breakpoint(
            line.get("breakpoint1")?,
            line.get("strand1(gene/fusion)")?,
        );
        let right = arriba_breakpoint(
            line.get("breakpoint2")?,
            line.get("strand2(gene/fusion)")?,
        );
        let details = evidence([
            ("position", Value::Text(position(&left, &right))),
            ("reading_frame", line.text("reading_frame")?),
            ("type", line.text("type")?),
            ("split_reads1", line.int("split_reads1")?),
            ("split_reads2", line.int("split_reads2")?),
            ("discordant_mates", line.int("discordant_mates")?),
            ("coverage1", line.int("coverage1")?),
            ("coverage2", line.int("coverage2")?),
            ("confidence", line.text("confidence")?),
        ]);

        let genes_a = gene_candidates(line.get("#gene1")?);
        let genes_b = gene_candidates(line.get("gene2")?);
        Ok(iproduct!(genes_a, genes_b)
            .map(|(gene_a, gene_b)| FusionCall::new(fusion_name(gene_a, gene_b), details.clone()))
            .collect())
    }
}
