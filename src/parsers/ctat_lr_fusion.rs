//! Parsing of CTAT-LR-Fusion (STAR-Fusion for Nanopore/PacBio long reads) output.

use super::{evidence, FusionCall, Line, LineParser, Value};
use crate::common::{position, strip_chr_breakpoint};
use crate::err::ParseError;

/// CTAT-LR-Fusion output parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct CtatLrFusion;

impl LineParser for CtatLrFusion {
    fn parse_line(&self, line: &Line) -> Result<Vec<FusionCall>, ParseError> {
        let left = strip_chr_breakpoint(line.get("LeftBreakpoint")?);
        let right = strip_chr_breakpoint(line.get("RightBreakpoint")?);

        Ok(vec![FusionCall::new(
            line.get("#FusionName")?.to_owned(),
            evidence([
                ("position", Value::Text(position(&left, &right))),
                ("num_long_reads", line.int("num_LR")?),
                ("ffpm", line.float("LR_FFPM")?),
            ]),
        )])
    }
}
