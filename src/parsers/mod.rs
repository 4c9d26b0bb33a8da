//! Parsers for the output of the supported fusion detection tools.
//!
//! Every tool gets its own module implementing [`LineParser`] on top of a
//! header-indexed [`Line`].  The [`Tool`] enumeration is the static catalog
//! mapping tool keys to parser implementations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::err::ParseError;

pub mod arriba;
pub mod ctat_lr_fusion;
pub mod dragen;
pub mod ericscript;
pub mod fusioncatcher;
pub mod jaffa;
pub mod pizzly;
pub mod squid;
pub mod starfusion;
pub mod starseqr;

/// Separator between the two gene symbols of a fusion name.
pub const FUSION_SEPARATOR: &str = "--";

/// Build the canonical `GeneA--GeneB` fusion name.
pub fn fusion_name(gene_a: &str, gene_b: &str) -> String {
    format!("{}{}{}", gene_a, FUSION_SEPARATOR, gene_b)
}

/// Enumeration of the supported fusion detection tools.
///
/// The variant order is the order in which tool outputs are processed.
#[derive(
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    Display,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Copy,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tool {
    /// EricScript
    Ericscript,
    /// FusionCatcher
    Fusioncatcher,
    /// STAR-Fusion
    Starfusion,
    /// CTAT-LR-Fusion, STAR-Fusion for long reads
    CtatLrFusion,
    /// Arriba
    Arriba,
    /// Pizzly
    Pizzly,
    /// Squid
    Squid,
    /// Illumina Dragen
    Dragen,
    /// JAFFA
    Jaffa,
    /// STAR-SEQR
    Starseqr,
}

impl Tool {
    /// Human readable name of the tool.
    pub fn label(&self) -> &'static str {
        match self {
            Tool::Ericscript => "EricScript",
            Tool::Fusioncatcher => "FusionCatcher",
            Tool::Starfusion => "STAR-Fusion",
            Tool::CtatLrFusion => "CTAT-LR-Fusion",
            Tool::Arriba => "Arriba",
            Tool::Pizzly => "Pizzly",
            Tool::Squid => "Squid",
            Tool::Dragen => "Dragen",
            Tool::Jaffa => "JAFFA",
            Tool::Starseqr => "STAR-SEQR",
        }
    }

    /// Field delimiter of the tool's output file.
    pub fn delimiter(&self) -> char {
        match self {
            Tool::Jaffa => ',',
            _ => '\t',
        }
    }

    /// Construct a fresh parser for the tool's output.
    pub fn parser(&self) -> Box<dyn FusionParser> {
        match self {
            Tool::Ericscript => Box::new(ToolParser::new(ericscript::Ericscript)),
            Tool::Fusioncatcher => Box::new(ToolParser::new(fusioncatcher::Fusioncatcher)),
            Tool::Starfusion => Box::new(ToolParser::new(starfusion::Starfusion)),
            Tool::CtatLrFusion => Box::new(ToolParser::new(ctat_lr_fusion::CtatLrFusion)),
            Tool::Arriba => Box::new(ToolParser::new(arriba::Arriba)),
            Tool::Pizzly => Box::new(ToolParser::new(pizzly::Pizzly)),
            Tool::Squid => Box::new(ToolParser::new(squid::Squid)),
            Tool::Dragen => Box::new(ToolParser::new(dragen::Dragen)),
            Tool::Jaffa => Box::new(ToolParser::new(jaffa::Jaffa)),
            Tool::Starseqr => Box::new(ToolParser::new(starseqr::Starseqr)),
        }
    }
}

/// One value in an evidence record.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{}", value),
            Value::Float(value) => write!(f, "{}", value),
            Value::Text(value) => write!(f, "{}", value),
        }
    }
}

/// Tool-specific details supporting one detection of a fusion.
///
/// Entries keep their insertion order so serialization is reproducible.
pub type Evidence = IndexMap<String, Value>;

/// Build an [`Evidence`] record from key/value pairs.
pub fn evidence<const N: usize>(entries: [(&str, Value); N]) -> Evidence {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}

/// One fusion identity with its evidence, as produced from one output line.
#[derive(Debug, Clone, PartialEq, derive_new::new)]
pub struct FusionCall {
    /// The `GeneA--GeneB` fusion name, empty for filtered records.
    pub name: String,
    /// The tool-specific evidence.
    pub evidence: Evidence,
}

/// Mapping from column name to column index, built from a header line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Header {
    columns: IndexMap<String, usize>,
}

impl Header {
    /// Parse header line; quotes are removed and names trimmed.
    ///
    /// The first occurrence wins for duplicated column names.
    pub fn parse(header_line: &str, delimiter: char) -> Self {
        let mut columns = IndexMap::new();
        for (index, name) in header_line
            .replace('"', "")
            .trim()
            .split(delimiter)
            .enumerate()
        {
            columns.entry(name.trim().to_owned()).or_insert(index);
        }
        Self { columns }
    }

    /// Index of the column with the given name.
    pub fn index_of(&self, column: &str) -> Result<usize, ParseError> {
        self.columns
            .get(column)
            .copied()
            .ok_or_else(|| ParseError::MissingColumn(column.to_owned()))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the header has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One data line split into fields, with column lookup by header name.
#[derive(Debug)]
pub struct Line<'a> {
    header: &'a Header,
    fields: Vec<&'a str>,
}

impl<'a> Line<'a> {
    pub fn new(header: &'a Header, line: &'a str, delimiter: char) -> Self {
        Self {
            header,
            fields: line.split(delimiter).map(str::trim).collect(),
        }
    }

    /// Raw (trimmed) value of the given column.
    pub fn get(&self, column: &str) -> Result<&'a str, ParseError> {
        let index = self.header.index_of(column)?;
        self.fields
            .get(index)
            .copied()
            .ok_or_else(|| ParseError::TooFewFields {
                column: column.to_owned(),
                index,
                actual: self.fields.len(),
            })
    }

    /// Value of the given column as text.
    pub fn text(&self, column: &str) -> Result<Value, ParseError> {
        Ok(Value::Text(self.get(column)?.to_owned()))
    }

    /// Value of the given column, strictly converted to an integer.
    pub fn int(&self, column: &str) -> Result<Value, ParseError> {
        let value = self.get(column)?;
        value
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|source| ParseError::InvalidInt {
                column: column.to_owned(),
                value: value.to_owned(),
                source,
            })
    }

    /// Value of the given column, strictly converted to a finite float.
    pub fn float(&self, column: &str) -> Result<Value, ParseError> {
        let value = self.get(column)?;
        let invalid = |reason: String| ParseError::InvalidFloat {
            column: column.to_owned(),
            value: value.to_owned(),
            reason,
        };
        match value.parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(Value::Float(number)),
            Ok(_) => Err(invalid("not a finite number".to_owned())),
            Err(e) => Err(invalid(e.to_string())),
        }
    }

    /// Split the `A<sep>B` gene pair in the given column into a fusion name.
    pub fn gene_pair(&self, column: &str, sep: char) -> Result<String, ParseError> {
        let value = self.get(column)?;
        let mut genes = value.split(sep).map(str::trim);
        match (genes.next(), genes.next()) {
            (Some(gene_a), Some(gene_b)) if !gene_a.is_empty() && !gene_b.is_empty() => {
                Ok(fusion_name(gene_a, gene_b))
            }
            _ => Err(ParseError::InvalidGenePair {
                column: column.to_owned(),
                value: value.to_owned(),
            }),
        }
    }
}

/// Parsing of a fusion tool's output, one header followed by data lines.
pub trait FusionParser {
    /// Establish the column mapping from the header line.
    fn set_header(&mut self, header_line: &str, delimiter: char);

    /// Parse one data line into zero or more fusion calls.
    ///
    /// Calls with an empty name are filtered records and must be dropped.
    fn parse(&self, line: &str, delimiter: char) -> Result<Vec<FusionCall>, ParseError>;
}

/// Tool-specific interpretation of one header-indexed line.
pub trait LineParser {
    fn parse_line(&self, line: &Line) -> Result<Vec<FusionCall>, ParseError>;
}

/// Generic [`FusionParser`] that owns the header and delegates to a [`LineParser`].
#[derive(Debug, Default)]
pub struct ToolParser<P> {
    header: Option<Header>,
    inner: P,
}

impl<P: LineParser> ToolParser<P> {
    pub fn new(inner: P) -> Self {
        Self {
            header: None,
            inner,
        }
    }
}

impl<P: LineParser> FusionParser for ToolParser<P> {
    fn set_header(&mut self, header_line: &str, delimiter: char) {
        self.header = Some(Header::parse(header_line, delimiter));
    }

    fn parse(&self, line: &str, delimiter: char) -> Result<Vec<FusionCall>, ParseError> {
        let header = self.header.as_ref().ok_or(ParseError::NoHeader)?;
        let cleaned = line.replace('"', "");
        let line = Line::new(header, cleaned.trim_end_matches(['\r', '\n']), delimiter);
        self.inner.parse_line(&line)
    }
}
