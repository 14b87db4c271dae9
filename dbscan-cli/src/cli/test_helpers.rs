//! Small helpers shared across CLI tests.
//!
//! Tests write temporary input files and build `run` commands around them.
//! These helpers keep the cases concise.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use dbscan_core::{DEFAULT_LEAF_SIZE, DEFAULT_MIN_NEIGHBOURS, DEFAULT_RADIUS};
use tempfile::TempDir;

use super::commands::run_command;
use super::{
    Cli, CliError, Command, IndexKind, RunCommand, RunSource, TextArgs, TextMetric, VectorArgs,
    VectorMetric, run_cli,
};

/// Two tight triangles of points and one far outlier.
pub(super) const VECTORS: &str = "\
# two groups and an outlier
0,0
0.5,0
0,0.5
10 10
10.5 10
10 10.5

50,-50
";

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_text_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

/// A `run` command with default engine settings over `source`.
pub(super) fn run_with(source: RunSource) -> RunCommand {
    RunCommand {
        radius: DEFAULT_RADIUS,
        min_neighbours: DEFAULT_MIN_NEIGHBOURS,
        index: IndexKind::BallTree,
        leaf_size: DEFAULT_LEAF_SIZE.get(),
        source,
    }
}

pub(super) fn vectors(path: PathBuf, metric: VectorMetric) -> RunSource {
    RunSource::Vectors(VectorArgs {
        path,
        metric,
        name: None,
    })
}

pub(super) fn text(path: PathBuf) -> RunSource {
    RunSource::Text(TextArgs {
        path,
        metric: TextMetric::Levenshtein,
        name: None,
    })
}

pub(super) fn run_cli_expecting_error(command: RunCommand, panic_msg: &str) -> CliError {
    let cli = Cli {
        command: Command::Run(command),
    };
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}

pub(super) fn run_command_expecting_error(command: RunCommand, panic_msg: &str) -> CliError {
    match run_command(command) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
