//! Parsing of STAR-SEQR `*_STAR-SEQR_candidates.txt` output.

use super::{evidence, FusionCall, Line, LineParser, Value};
use crate::common::{position, strip_chr_breakpoint};
use crate::err::ParseError;

/// STAR-SEQR output parser; names are already `GeneA--GeneB`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Starseqr;

impl LineParser for Starseqr {
    fn parse_line(&self, line: &Line) -> Result<Vec<FusionCall>, ParseError> {
        let left = strip_chr_breakpoint(line.get("BRKPT_LEFT")?);
        let right = strip_chr_breakpoint(line.get("BRKPT_RIGHT")?);

        Ok(vec![FusionCall::new(
            line.get("NAME")?.to_owned(),
            evidence([
                ("position", Value::Text(position(&left, &right))),
                ("nread_spans", line.int("NREAD_SPANS")?),
                ("nread_jxnleft", line.int("NREAD_JXNLEFT")?),
                ("nread_jxnright", line.int("NREAD_JXNRIGHT")?),
            ]),
        )])
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::err::ParseError;
    use crate::parsers::{test::parse_first_line, Tool, Value};

    #[test]
    fn first_line() -> Result<(), anyhow::Error> {
        let calls = parse_first_line(Tool::Starseqr, "tests/data/starseqr.tsv")?;

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "FGFR3--TACC3");
        assert_eq!(
            calls[0].evidence["position"],
            Value::Text("4:1808661:+#4:1741428:+".into())
        );
        assert_eq!(calls[0].evidence["nread_spans"], Value::Int(12));

        Ok(())
    }

    #[test]
    fn malformed_count() {
        let mut parser = Tool::Starseqr.parser();
        parser.set_header(
            "NAME\tNREAD_SPANS\tNREAD_JXNLEFT\tNREAD_JXNRIGHT\tBRKPT_LEFT\tBRKPT_RIGHT",
            '\t',
        );
        let err = parser
            .parse("A--B\tmany\t1\t1\tchr1:1:+\tchr2:2:-", '\t')
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidInt { ref column, .. } if column == "NREAD_SPANS"));
    }
}
