//! Parsing of FusionCatcher `final-list_candidate-fusion-genes.txt` output.

use super::{evidence, fusion_name, FusionCall, Line, LineParser, Value};
use crate::common::{position, strip_chr_breakpoint};
use crate::err::ParseError;

/// FusionCatcher output parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fusioncatcher;

impl LineParser for Fusioncatcher {
    fn parse_line(&self, line: &Line) -> Result<Vec<FusionCall>, ParseError> {
        let name = fusion_name(
            line.get("Gene_1_symbol(5end_fusion_partner)")?,
            line.get("Gene_2_symbol(3end_fusion_partner)")?,
        );
        let left = strip_chr_breakpoint(line.get("Fusion_point_for_gene_1(5end_fusion_partner)")?);
        let right =
            strip_chr_breakpoint(line.get("Fusion_point_for_gene_2(3end_fusion_partner)")?);

        Ok(vec![FusionCall::new(
            name,
            evidence([
                ("position", Value::Text(position(&left, &right))),
                (
                    "common_mapping_reads",
                    line.int("Counts_of_common_mapping_reads")?,
                ),
                ("spanning_pairs", line.int("Spanning_pairs")?),
                ("spanning_unique_reads", line.int("Spanning_unique_reads")?),
                ("longest_anchor", line.int("Longest_anchor_found")?),
                ("fusion_type", line.text("Predicted_effect")?),
            ]),
        )])
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::parsers::{test::parse_first_line, Tool, Value};

    #[test]
    fn first_line() -> Result<(), anyhow::Error> {
        let calls = parse_first_line(Tool::Fusioncatcher, "tests/data/fusioncatcher.txt")?;

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "FGFR3--TACC3");
        assert_eq!(
            calls[0].evidence["position"],
            Value::Text("4:1808661:+#4:1741428:+".into())
        );
        assert_eq!(calls[0].evidence["spanning_pairs"], Value::Int(17));
        assert_eq!(
            calls[0].evidence["fusion_type"],
            Value::Text("in-frame".into())
        );

        Ok(())
    }
}
