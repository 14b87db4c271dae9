//! Entry point for the `dbscan` binary.
//!
//! Parses arguments with clap, clusters the requested file, writes the labels
//! to stdout and maps failures to a non-zero exit code. Logging is installed
//! first so every later step can emit structured diagnostics.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use dbscan_cli::{
    cli::{Cli, CliError, InputError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

/// Stable error codes carried by `err`, if any.
fn error_codes(err: &anyhow::Error) -> (Option<&'static str>, Option<&'static str>) {
    match err.downcast_ref::<CliError>() {
        Some(CliError::Core(core)) => (
            Some(core.code().as_str()),
            core.query_code().map(|code| code.as_str()),
        ),
        Some(CliError::Input {
            source: InputError::Dataset(dataset),
            ..
        }) => (Some(dataset.code().as_str()), None),
        _ => (None, None),
    }
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let (code, query_code) = error_codes(&err);
        error!(
            error = %err,
            code = code.map(field::display),
            query_code = query_code.map(field::display),
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
