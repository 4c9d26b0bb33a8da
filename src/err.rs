//! Error types raised while parsing fusion tool output.

use std::num::ParseIntError;

/// Problems with one line of fusion tool output.
///
/// All of these are fatal for an aggregation run.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("column {0:?} not found in header")]
    MissingColumn(String),
    #[error("line has {actual} fields but column {column:?} is at index {index}")]
    TooFewFields {
        column: String,
        index: usize,
        actual: usize,
    },
    #[error("invalid integer {value:?} in column {column:?}: {source}")]
    InvalidInt {
        column: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("invalid float {value:?} in column {column:?}: {reason}")]
    InvalidFloat {
        column: String,
        value: String,
        reason: String,
    },
    #[error("malformed gene pair {value:?} in column {column:?}")]
    InvalidGenePair { column: String, value: String },
    #[error("header was not set before parsing")]
    NoHeader,
}
