//! Per-database rules turning stored identifiers into `GeneA--GeneB` names.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parsers::{fusion_name, FUSION_SEPARATOR};

/// Gene symbols followed by a braced transcript, e.g. `BCR{ENST00000305877}`.
///
/// Symbols may contain dots (`AC008079.1`) but no underscores, which separate
/// the preceding `r.` range.
static BRACED_SYMBOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z0-9.\-]+)\{").expect("invalid regex in source code"));

/// Parenthesized gene symbols, e.g. `ENST00000318560.5(ABL1)`.
static PARENTHESIZED_SYMBOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^()]*)\)").expect("invalid regex in source code"));

fn join_symbols<'a>(symbols: impl Iterator<Item = &'a str>) -> Option<String> {
    let symbols = symbols
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();
    if symbols.len() < 2 {
        None
    } else {
        Some(symbols.join(FUSION_SEPARATOR))
    }
}

/// COSMIC legacy translocation name such as
/// `BCR{ENST00000305877}:r.1_2866_ABL1{ENST00000318560}:r.461_5766`.
pub fn cosmic_translocation(translocation_name: &str) -> Option<String> {
    join_symbols(
        BRACED_SYMBOL
            .captures_iter(translocation_name)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str()),
    )
}

/// COSMIC 5'/3' partner columns such as `ENST00000305877.12(BCR)`.
///
/// Values without parentheses are taken as plain gene symbols.
pub fn cosmic_partners(five_prime: &str, three_prime: &str) -> Option<String> {
    let symbol = |value: &'_ str| -> String {
        let inner = PARENTHESIZED_SYMBOL
            .captures_iter(value)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .collect::<Vec<_>>();
        if inner.is_empty() {
            value.trim().to_owned()
        } else {
            inner.join(FUSION_SEPARATOR)
        }
    };
    let (five, three) = (symbol(five_prime), symbol(three_prime));
    if five.is_empty() || three.is_empty() {
        None
    } else {
        Some(fusion_name(&five, &three))
    }
}

/// Mitelman `geneshort` value; only `A/B` and `A::B` entries denote fusions.
pub fn mitelman(geneshort: &str) -> Option<String> {
    let value = geneshort.trim();
    if value.contains('/') || value.contains("::") {
        join_symbols(value.split('/').flat_map(|part| part.split("::")))
    } else {
        None
    }
}

/// FusionGDB head and tail gene.
pub fn fusiongdb(h_gene: &str, t_gene: &str) -> Option<String> {
    let (head, tail) = (h_gene.trim(), t_gene.trim());
    if head.is_empty() || tail.is_empty() {
        None
    } else {
        Some(fusion_name(head, tail))
    }
}

/// FusionGDB2 stores the joined name already.
pub fn fusiongdb2(fusions: &str) -> Option<String> {
    Some(fusions.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(
        "BCR{ENST00000305877}:r.1_2866_ABL1{ENST00000318560}:r.461_5766",
        Some("BCR--ABL1")
    )]
    #[case(
        "ETV6{NM_001987.4}:r.1_1033_NTRK3{NM_002530.3}:r.1601_2395",
        Some("ETV6--NTRK3")
    )]
    #[case(
        "AC008079.1{ENST00000400001}:r.1_100_ETV6{ENST00000396373}:r.1_2000",
        Some("AC008079.1--ETV6")
    )]
    #[case(
        "RP11-444D3.1{ENST00000411451.1}:r.1_185_BRAF{ENST00000288602.6}:r.1178_2510",
        Some("RP11-444D3.1--BRAF")
    )]
    #[case("BCR{ENST00000305877}:r.1_2866", None)]
    #[case("", None)]
    fn cosmic_translocation(#[case] value: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            super::cosmic_translocation(value).as_deref(),
            expected
        );
    }

    #[rstest]
    #[case("ENST00000305877.12(BCR)", "ENST00000318560.5(ABL1)", Some("BCR--ABL1"))]
    #[case("FGFR3", "TACC3", Some("FGFR3--TACC3"))]
    #[case("", "TACC3", None)]
    fn cosmic_partners(
        #[case] five_prime: &str,
        #[case] three_prime: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(
            super::cosmic_partners(five_prime, three_prime).as_deref(),
            expected
        );
    }

    #[rstest]
    #[case("BCR/ABL1", Some("BCR--ABL1"))]
    #[case(" TMPRSS2::ERG ", Some("TMPRSS2--ERG"))]
    #[case("KMT2A/MLLT3/MLLT10", Some("KMT2A--MLLT3--MLLT10"))]
    #[case("MYC", None)]
    fn mitelman(#[case] value: &str, #[case] expected: Option<&str>) {
        assert_eq!(super::mitelman(value).as_deref(), expected);
    }

    #[test]
    fn fusiongdb() {
        assert_eq!(
            super::fusiongdb("FGFR3", " TACC3").as_deref(),
            Some("FGFR3--TACC3")
        );
        assert_eq!(super::fusiongdb("FGFR3", ""), None);
        assert_eq!(
            super::fusiongdb2(" EML4--ALK\t").as_deref(),
            Some("EML4--ALK")
        );
        assert_eq!(super::fusiongdb2("  "), None);
    }
}
