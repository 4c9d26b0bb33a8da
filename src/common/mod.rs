//! Common functionality.

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};

pub mod io;

pub use io::{open_read_maybe_gz, open_write_maybe_gz, read_lines};

/// Commonly used command line arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Verbosity of the program
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            verbose: Verbosity::new(0, 0),
        }
    }
}

/// Return the version of the `fusion-report` crate and `x.y.z` in tests.
pub fn version() -> &'static str {
    if cfg!(test) {
        "x.y.z"
    } else {
        env!("CARGO_PKG_VERSION")
    }
}

/// Expand a leading `~` in a user-provided path.
pub fn expand_path(path: &str) -> String {
    shellexpand::tilde(path).into_owned()
}

/// Remove a literal `chr` prefix from a chromosome name.
pub fn strip_chr(chrom: &str) -> &str {
    chrom.strip_prefix("chr").unwrap_or(chrom)
}

/// Remove the `chr` prefix from the chromosome token of a `chrom:pos...` breakpoint.
pub fn strip_chr_breakpoint(breakpoint: &str) -> String {
    match breakpoint.split_once(':') {
        Some((chrom, rest)) => format!("{}:{}", strip_chr(chrom), rest),
        None => strip_chr(breakpoint).to_owned(),
    }
}

/// Build the `chrom:pos:strand` representation of one breakpoint.
pub fn breakpoint(chrom: &str, pos: &str, strand: &str) -> String {
    format!("{}:{}:{}", strip_chr(chrom), pos, strand)
}

/// Join two breakpoints to the `left#right` position string.
pub fn position(left: &str, right: &str) -> String {
    format!("{}#{}", left, right)
}
