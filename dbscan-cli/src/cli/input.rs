//! Readers turning line-oriented files into datasets.

use std::io::{self, BufRead};

use dbscan_core::{Dataset, DatasetError};
use thiserror::Error;

/// Errors raised while reading an input file.
#[derive(Debug, Error)]
pub enum InputError {
    /// Reading from the underlying stream failed.
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    /// The input held no records.
    #[error("input contains no records")]
    EmptyInput,
    /// A vector component could not be parsed.
    #[error("line {line}: `{token}` is not a number")]
    InvalidNumber {
        /// One-based line number of the offending record.
        line: usize,
        /// Token that failed to parse.
        token: String,
    },
    /// The parsed vectors do not form a valid dataset.
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

/// Reads one dense vector per line.
///
/// Components are separated by commas and/or whitespace. Blank lines and
/// lines starting with `#` are skipped.
///
/// # Errors
/// Returns [`InputError::EmptyInput`] when no records remain,
/// [`InputError::InvalidNumber`] for unparsable components, and
/// [`InputError::Dataset`] when rows disagree on dimension or hold
/// non-finite values.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use dbscan_cli::cli::read_vectors;
///
/// let dataset = read_vectors("demo", Cursor::new("# x,y\n0,0\n1.5 2\n"))?;
/// assert_eq!(dataset.as_slice(), [vec![0.0_f32, 0.0], vec![1.5, 2.0]]);
/// # Ok::<(), dbscan_cli::cli::InputError>(())
/// ```
pub fn read_vectors(name: &str, reader: impl BufRead) -> Result<Dataset<Vec<f32>>, InputError> {
    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let record = line.trim();
        if record.is_empty() || record.starts_with('#') {
            continue;
        }
        let row = record
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<f32>().map_err(|_| InputError::InvalidNumber {
                    line: index + 1,
                    token: token.to_owned(),
                })
            })
            .collect::<Result<Vec<f32>, _>>()?;
        rows.push(row);
    }
    if rows.is_empty() {
        return Err(InputError::EmptyInput);
    }
    Ok(Dataset::from_vectors(name, rows)?)
}

/// Reads one UTF-8 string per line, stripping line terminators.
///
/// # Errors
/// Returns [`InputError::Io`] when reading fails and
/// [`InputError::EmptyInput`] when the input has no lines.
pub fn read_lines(name: &str, reader: impl BufRead) -> Result<Dataset<String>, InputError> {
    let lines = reader.lines().collect::<Result<Vec<String>, _>>()?;
    if lines.is_empty() {
        return Err(InputError::EmptyInput);
    }
    Ok(Dataset::new(name, lines))
}
