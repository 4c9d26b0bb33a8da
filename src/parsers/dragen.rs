//! Parsing of Dragen `*.fusion_candidates.final` output.

use super::{evidence, FusionCall, Line, LineParser, Value};
use crate::common::{position, strip_chr_breakpoint};
use crate::err::ParseError;

/// Dragen RNA fusion caller output parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct Dragen;

impl LineParser for Dragen {
    fn parse_line(&self, line: &Line) -> Result<Vec<FusionCall>, ParseError> {
        let left = strip_chr_breakpoint(line.get("LeftBreakpoint")?);
        let right = strip_chr_breakpoint(line.get("RightBreakpoint")?);

        Ok(vec![FusionCall::new(
            line.get("#FusionGene")?.to_owned(),
            evidence([
                ("position", Value::Text(position(&left, &right))),
                ("score", line.float("Score")?),
            ]),
        )])
    }
}
