//! Command-line interface for the DBSCAN engine.
//!
//! The `run` command loads either a file of dense vectors or a line-based
//! UTF-8 text corpus, clusters it, and reports one label per point.

mod commands;
mod input;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, IndexKind, RunCommand, RunSource, TextArgs,
    TextMetric, VectorArgs, VectorMetric, render_summary, run_cli,
};
pub use input::{InputError, read_lines, read_vectors};

#[cfg(test)]
mod test_helpers;
