//! Parsing of JAFFA `jaffa_results.csv` output (comma separated).

use super::{evidence, FusionCall, Line, LineParser, Value};
use crate::common::{breakpoint, position};
use crate::err::ParseError;

/// JAFFA output parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct Jaffa;

impl LineParser for Jaffa {
    fn parse_line(&self, line: &Line) -> Result<Vec<FusionCall>, ParseError> {
        let name = line.gene_pair("fusion genes", ':')?;
        let left = breakpoint(
            line.get("chrom1")?,
            line.get("base1")?,
            line.get("strand1")?,
        );
        let right = breakpoint(
            line.get("chrom2")?,
            line.get("base2")?,
            line.get("strand2")?,
        );

        Ok(vec![FusionCall::new(
            name,
            evidence([
                ("position", Value::Text(position(&left, &right))),
                ("spanning_pairs", line.int("spanning pairs")?),
                ("spanning_reads", line.int("spanning reads")?),
                ("inframe", line.text("inframe")?),
                ("aligns", line.text("aligns")?),
                ("rearrangement", line.text("rearrangement")?),
                ("classification", line.text("classification")?),
                ("known", line.text("known")?),
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
        let calls = parse_first_line(Tool::Jaffa, "tests/data/jaffa.csv")?;

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "BCR--ABL1");
        assert_eq!(
            calls[0].evidence["position"],
            Value::Text("22:23632600:+#9:133729451:+".into())
        );
        assert_eq!(calls[0].evidence["spanning_pairs"], Value::Int(46));
        assert_eq!(
            calls[0].evidence["classification"],
            Value::Text("HighConfidence".into())
        );

        Ok(())
    }
}
