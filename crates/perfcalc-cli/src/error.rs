//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// Unknown cash-flow kind.
    #[error("Unknown cash-flow kind: {0}. Run `perfcalc classify --all` for the list.")]
    UnknownKind(String),

    /// Missing required argument.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// An input file could not be read.
    #[error("Cannot read {path}: {source}")]
    Read {
        /// File that was being read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// An input document did not parse.
    #[error("Invalid input in {path}: {reason}")]
    InvalidInput {
        /// File that was being parsed.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
