//! Defines the error type shared by the whole pipeline.

use std::io;
use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;


/// A `Result` alias where the `Err` case is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;


/// Errors raised while cleaning, merging, or analyzing a yearly dataset.
///
/// Every failure is local to one table or one operation;
/// the pipeline never retries, since the source files are static per year.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to open or create a file. The path is kept for diagnostics.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// The file that could not be accessed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An error bubbled up from the underlying table engine
    /// (CSV parsing, joins, casts).
    #[error("table operation failed: {0}")]
    Polars(#[from] PolarsError),

    /// A column named by the cleaning rules is absent from the source
    /// table. This usually means the source schema drifted across years.
    #[error("table `{table}` has no column `{column}`")]
    MissingColumn {
        /// The table whose schema is incomplete.
        table: String,
        /// The expected column.
        column: String,
    },

    /// A raw field value does not match the shape a transform expects
    /// (non-hex token, malformed time string, unparseable number).
    #[error("malformed value `{value}` in column `{column}`: {reason}")]
    MalformedField {
        /// The column holding the malformed value.
        column: String,
        /// The raw value as read from the source file.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Missing values survived where an integer column is due.
    #[error("column `{column}` still holds {count} missing values")]
    MissingValues {
        /// The offending column.
        column: String,
        /// How many values are missing.
        count: usize,
    },

    /// Narrowing a column would lose information.
    /// Silent wraparound corrupts every statistic downstream,
    /// so the cleaner aborts instead.
    #[error("column `{column}` holds {value}, which does not fit into {width}")]
    NarrowOverflow {
        /// The column that cannot be narrowed.
        column: String,
        /// The first value found outside the target range.
        value: i64,
        /// The target width, e.g. `int8`.
        width: &'static str,
    },

    /// The analyzer received input it cannot split or fit
    /// (fewer than two samples, a single class, one feature, ragged rows).
    #[error("degenerate analysis input: {0}")]
    DegenerateInput(String),

    /// Serializing a merge report failed.
    #[error("failed to encode merge report: {0}")]
    Report(#[from] serde_json::Error),

    /// The plotting backend failed while rendering a diagnostic figure.
    #[error("failed to render plot: {0}")]
    Plot(String),
}


impl Error {
    /// Attach a column name to a [`Error::MalformedField`] raised by a
    /// pure field transform, which only knows the value it rejected.
    pub(crate) fn in_column(self, column: &str) -> Self {
        match self {
            Self::MalformedField { value, reason, .. } => {
                Self::MalformedField {
                    column: column.to_string(),
                    value,
                    reason,
                }
            },
            other => other,
        }
    }
}
