//! Error type for the command-line driver.

use cg_dataset::{AssembleError, ConfigError, DatasetError, StoreError};
use cg_oracle::OracleError;

pub type CliResult<T> = Result<T, CliError>;

/// Wraps the library errors so `main` can return one type.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Generation error: {0}")]
    Assemble(#[from] AssembleError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Dataset(#[from] DatasetError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{failed} of {total} pairs failed")]
    BatchFailed { failed: usize, total: usize },

    #[error("Channels disagree: max relative deviation {max_deviation:.3e} exceeds {tolerance:.3e}")]
    ChannelMismatch { max_deviation: f64, tolerance: f64 },
}
