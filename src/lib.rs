//! Aggregation and scoring of gene fusion calls from RNA fusion detection tools.

pub mod aggregate;
pub mod common;
pub mod db;
pub mod err;
pub mod fusion;
pub mod parsers;
pub mod registry;
pub mod score;
