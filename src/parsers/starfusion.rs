//! Parsing of STAR-Fusion `star-fusion.fusion_predictions.tsv` output.

use super::{evidence, FusionCall, Line, LineParser, Value};
use crate::common::{position, strip_chr_breakpoint};
use crate::err::ParseError;

/// STAR-Fusion output parser; the tool already emits `GeneA--GeneB` names.
#[derive(Debug, Default, Clone, Copy)]
pub struct Starfusion;

impl LineParser for Starfusion {
    fn parse_line(&self, line: &Line) -> Result<Vec<FusionCall>, ParseError> {
        let left = strip_chr_breakpoint(line.get("LeftBreakpoint")?);
        let right = strip_chr_breakpoint(line.get("RightBreakpoint")?);

        Ok(vec![FusionCall::new(
            line.get("#FusionName")?.to_owned(),
            evidence([
                ("position", Value::Text(position(&left, &right))),
                ("junction_reads", line.int("JunctionReadCount")?),
                ("spanning_reads", line.int("SpanningFragCount")?),
                ("ffpm", line.float("FFPM")?),
            ]),
        )])
    }
}
