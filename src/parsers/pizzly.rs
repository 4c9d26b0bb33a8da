//! Parsing of Pizzly flattened `*.txt` output.

use super::{evidence, fusion_name, FusionCall, Line, LineParser};
use crate::err::ParseError;

/// Pizzly output parser; Pizzly reports no breakpoint positions.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pizzly;

impl LineParser for Pizzly {
    fn parse_line(&self, line: &Line) -> Result<Vec<FusionCall>, ParseError> {
        Ok(vec![FusionCall::new(
            fusion_name(line.get("geneA.name")?, line.get("geneB.name")?),
            evidence([
                ("pair_count", line.int("paircount")?),
                ("split_count", line.int("splitcount")?),
            ]),
        )])
    }
}
