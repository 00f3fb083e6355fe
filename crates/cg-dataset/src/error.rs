//! Dataset-generation errors.

use cg_oracle::OracleError;
use thiserror::Error;

pub type DatasetResult<T> = Result<T, DatasetError>;
pub type StoreResult<T> = Result<T, StoreError>;

/// Invalid bounds or configuration, raised at construction or load.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid bounds for {dimension}: min {min} must be below max {max}")]
    InvalidBounds {
        dimension: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Non-finite bound for {dimension}")]
    NonFiniteBound { dimension: &'static str },

    #[error("Interval for {dimension} is too wide to sample: [{min}, {max})")]
    UnsampleableWidth {
        dimension: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Invalid value: {field} ({reason})")]
    InvalidValue { field: &'static str, reason: String },

    #[error("No {role} configured")]
    EmptyPropellants { role: &'static str },

    #[error("max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Failure of one `generate` call.
#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("Attempt ceiling reached: {accepted} rows accepted after {attempted} attempts")]
    AttemptsExhausted { accepted: usize, attempted: usize },

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Invalid assembler options: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}

/// Anything that can go wrong producing one pair's dataset end to end.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Generation error: {0}")]
    Assemble(#[from] AssembleError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}
