//! Command implementations and argument parsing for the dbscan CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dbscan_core::{
    Chebyshev, ClusteringResult, DEFAULT_LEAF_SIZE, DEFAULT_MIN_NEIGHBOURS, DEFAULT_RADIUS, Dataset,
    DbscanBuilder, DbscanError, DbscanParams, Euclidean, IndexStrategy, Levenshtein, Manhattan,
    Metric, PointLabel,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::input::{InputError, read_lines, read_vectors};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "dbscan", about = "Cluster points by density with DBSCAN.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cluster a file of points.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Neighbourhood radius; points exactly this far apart are not neighbours.
    #[arg(long, default_value_t = DEFAULT_RADIUS)]
    pub radius: f32,

    /// Neighbours (including the point itself) required for a core point.
    #[arg(long = "min-neighbours", default_value_t = DEFAULT_MIN_NEIGHBOURS)]
    pub min_neighbours: usize,

    /// Range query index used to find neighbours.
    #[arg(long, value_enum, default_value_t = IndexKind::BallTree)]
    pub index: IndexKind,

    /// Maximum number of points per ball tree leaf.
    #[arg(long = "leaf-size", default_value_t = DEFAULT_LEAF_SIZE.get())]
    pub leaf_size: usize,

    /// Data source configuration.
    #[command(subcommand)]
    pub source: RunSource,
}

/// Range query indices selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IndexKind {
    /// Metric ball tree.
    BallTree,
    /// Exhaustive linear scan.
    Linear,
}

impl From<IndexKind> for IndexStrategy {
    fn from(kind: IndexKind) -> Self {
        match kind {
            IndexKind::BallTree => Self::BallTree,
            IndexKind::Linear => Self::LinearScan,
        }
    }
}

/// Input data sources.
#[derive(Debug, Subcommand, Clone)]
pub enum RunSource {
    /// Dense `f32` vectors, one per line, comma or whitespace separated.
    Vectors(VectorArgs),
    /// A UTF-8 text corpus, one string per line.
    Text(TextArgs),
}

/// Vector ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct VectorArgs {
    /// Path to a text file holding one vector per line.
    ///
    /// Components are separated by commas and/or whitespace, for example
    /// `1.5, 2.0` or `1.5 2.0`. Every row must have the same number of
    /// finite components. Blank lines and lines starting with `#` are
    /// skipped.
    pub path: PathBuf,

    /// Distance metric used to compare vectors.
    #[arg(long, value_enum, default_value_t = VectorMetric::Euclidean)]
    pub metric: VectorMetric,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Supported vector metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VectorMetric {
    /// Straight-line (L2) distance.
    Euclidean,
    /// Taxicab (L1) distance.
    Manhattan,
    /// Maximum-coordinate (L∞) distance.
    Chebyshev,
}

/// Text ingestion arguments.
#[derive(Debug, Args, Clone)]
pub struct TextArgs {
    /// Path to a UTF-8 text file with one string per line.
    pub path: PathBuf,

    /// Distance metric used to compare lines.
    #[arg(long, value_enum, default_value_t = TextMetric::Levenshtein)]
    pub metric: TextMetric,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Supported text metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TextMetric {
    /// Levenshtein edit distance between lines.
    Levenshtein,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// An input file could not be parsed.
    #[error("failed to load `{path}`: {source}")]
    Input {
        /// Path of the offending file.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: InputError,
    },
    /// Configuring or running the clustering engine failed.
    #[error(transparent)]
    Core(#[from] DbscanError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name of the clustered dataset.
    pub data_source: String,
    /// Labels produced by the run.
    pub result: ClusteringResult,
}

/// Engine configuration shared by every data source.
#[derive(Debug, Clone, Copy)]
struct EngineSettings {
    params: DbscanParams,
    strategy: IndexStrategy,
    leaf_size: usize,
}

impl EngineSettings {
    fn cluster<T, M>(self, dataset: Dataset<T>, metric: M) -> Result<ExecutionSummary, CliError>
    where
        T: Send + Sync + 'static,
        M: Metric<T> + Clone + 'static,
    {
        let data_source = dataset.name().to_owned();
        let mut dbscan = DbscanBuilder::new()
            .with_radius(self.params.radius())
            .with_min_neighbours(self.params.min_neighbours())
            .with_index_strategy(self.strategy)
            .with_leaf_size(self.leaf_size)
            .build(Arc::new(dataset), metric)?;
        let result = dbscan.run()?;
        Ok(ExecutionSummary {
            data_source,
            result,
        })
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the input or clustering fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use dbscan_cli::cli::{Cli, Command, IndexKind, RunCommand, RunSource, TextArgs, TextMetric, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "kitten\nmitten\nzebra\n")?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         radius: 1.5,
///         min_neighbours: 2,
///         index: IndexKind::BallTree,
///         leaf_size: 32,
///         source: RunSource::Text(TextArgs {
///             path: file.path().to_path_buf(),
///             metric: TextMetric::Levenshtein,
///             name: None,
///         }),
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.result.cluster_count(), 1);
/// assert_eq!(summary.result.noise(), [2]);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(
        radius = command.radius,
        min_neighbours = command.min_neighbours,
        index = ?command.index,
        source = field::Empty,
    ),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let settings = EngineSettings {
        params: DbscanParams::new(command.radius, command.min_neighbours)?,
        strategy: command.index.into(),
        leaf_size: command.leaf_size,
    };

    let span = Span::current();
    let summary = match command.source {
        RunSource::Vectors(args) => {
            span.record("source", field::display("vectors"));
            run_vectors(settings, args)?
        }
        RunSource::Text(args) => {
            span.record("source", field::display("text"));
            run_text(settings, args)?
        }
    };

    info!(
        data_source = summary.data_source.as_str(),
        clusters = summary.result.cluster_count(),
        noise = summary.result.noise_count(),
        "command completed"
    );
    Ok(summary)
}

#[instrument(
    name = "cli.run_vectors",
    err,
    skip(settings, args),
    fields(path = field::Empty, metric = field::Empty, override_name = field::Empty),
)]
fn run_vectors(settings: EngineSettings, args: VectorArgs) -> Result<ExecutionSummary, CliError> {
    let VectorArgs { path, metric, name } = args;
    let span = Span::current();
    span.record("path", field::display(path.display()));
    span.record("metric", field::debug(metric));
    span.record(
        "override_name",
        field::display(name.as_deref().unwrap_or("<derived>")),
    );
    let chosen_name = derive_data_source_name(&path, name.as_deref());
    let reader = open_reader(&path)?;
    let dataset =
        read_vectors(&chosen_name, reader).map_err(|source| CliError::Input { path, source })?;
    match metric {
        VectorMetric::Euclidean => settings.cluster(dataset, Euclidean),
        VectorMetric::Manhattan => settings.cluster(dataset, Manhattan),
        VectorMetric::Chebyshev => settings.cluster(dataset, Chebyshev),
    }
}

#[instrument(
    name = "cli.run_text",
    err,
    skip(settings, args),
    fields(path = field::Empty, metric = field::Empty, override_name = field::Empty),
)]
fn run_text(settings: EngineSettings, args: TextArgs) -> Result<ExecutionSummary, CliError> {
    let TextArgs { path, metric, name } = args;
    let span = Span::current();
    span.record("path", field::display(path.display()));
    span.record("metric", field::debug(metric));
    span.record(
        "override_name",
        field::display(name.as_deref().unwrap_or("<derived>")),
    );
    let chosen_name = derive_data_source_name(&path, name.as_deref());
    let reader = open_reader(&path)?;
    let dataset =
        read_lines(&chosen_name, reader).map_err(|source| CliError::Input { path, source })?;
    match metric {
        TextMetric::Levenshtein => settings.cluster(dataset, Levenshtein),
    }
}

#[instrument(name = "cli.open_reader", err, fields(path = field::Empty))]
pub(super) fn open_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    Span::current().record("path", field::display(path.display()));
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "data_source".to_owned())
}

/// Renders `summary` to `writer`: a header followed by one
/// `index<TAB>cluster` line per point, with `noise` in place of the cluster.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use dbscan_cli::cli::{ExecutionSummary, render_summary};
/// # use dbscan_core::{ClusterId, ClusteringResult, PointLabel};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     data_source: "demo".into(),
///     result: ClusteringResult::try_from_labels(vec![
///         PointLabel::Member(ClusterId::new(0)),
///         PointLabel::Noise,
///     ])?,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(
///     String::from_utf8(buffer)?,
///     "data source: demo\nclusters: 1\nnoise: 1\n0\t0\n1\tnoise\n"
/// );
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(writer, "clusters: {}", summary.result.cluster_count())?;
    writeln!(writer, "noise: {}", summary.result.noise_count())?;
    for (index, label) in summary.result.labels().iter().enumerate() {
        match label {
            PointLabel::Member(cluster) => writeln!(writer, "{index}\t{cluster}")?,
            PointLabel::Noise | PointLabel::Unassigned => writeln!(writer, "{index}\tnoise")?,
        }
    }
    Ok(())
}
