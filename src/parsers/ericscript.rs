//! Parsing of EricScript `*.results.total.tsv` output.

use super::{evidence, fusion_name, FusionCall, Line, LineParser, Value};
use crate::common::{breakpoint, position};
use crate::err::ParseError;

/// EricScript output parser.
///
/// Evidence fields: `position`, `discordant_reads`, `junction_reads`,
/// `fusion_type`, `gene_expr1`, `gene_expr2`, `gene_expr_fusion`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ericscript;

impl LineParser for Ericscript {
    fn parse_line(&self, line: &Line) -> Result<Vec<FusionCall>, ParseError> {
        let name = fusion_name(line.get("GeneName1")?, line.get("GeneName2")?);
        let left = breakpoint(
            line.get("chr1")?,
            line.get("Breakpoint1")?,
            line.get("strand1")?,
        );
        let right = breakpoint(
            line.get("chr2")?,
            line.get("Breakpoint2")?,
            line.get("strand2")?,
        );

        Ok(vec![FusionCall::new(
            name,
            evidence([
                ("position", Value::Text(position(&left, &right))),
                ("discordant_reads", line.int("crossingreads")?),
                ("junction_reads", line.int("spanningreads")?),
                ("fusion_type", line.text("fusiontype")?),
                ("gene_expr1", line.float("GeneExpr1")?),
                ("gene_expr2", line.float("GeneExpr2")?),
                ("gene_expr_fusion", line.float("GeneExpr_Fused")?),
            ]),
        )])
    }
}
