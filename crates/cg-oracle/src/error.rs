//! Oracle invocation errors.

use cg_core::CgError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;

/// Infrastructure failures while talking to an equilibrium oracle.
///
/// Non-convergence for a sample is not an error: it shows up as failure
/// markers inside the report text.
#[derive(Error, Debug)]
pub enum OracleError {
    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Core(#[from] CgError),

    /// Propellant identifier not known to this backend.
    #[error("Unknown propellant '{name}' for backend {backend}")]
    UnknownPropellant { name: String, backend: &'static str },

    /// The oracle executable could not be started.
    #[error("Failed to launch oracle executable {exe}: {source}")]
    Spawn {
        exe: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File I/O around an oracle invocation failed.
    #[error("I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The oracle process exited unsuccessfully.
    #[error("Oracle exited with status {code:?}: {stderr}")]
    ExitStatus { code: Option<i32>, stderr: String },

    /// An expected output file was not produced.
    #[error("Oracle produced no output at {path}")]
    MissingOutput { path: PathBuf },

    /// The numeric accessor table could not be read.
    #[error("Malformed plot table: {message}")]
    MalformedPlot { message: String },
}

impl OracleError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = OracleError::UnknownPropellant {
            name: "Unobtainium".into(),
            backend: "analytic",
        };
        assert!(err.to_string().contains("Unobtainium"));

        let err = OracleError::io(
            "writing deck",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("writing deck"));
    }
}
