//! CLI-specific error types and mappings.
//!
//! Maps detection failures onto exit codes and user-facing categories.

use pathscout_core::DetectError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Paths could not be resolved.
    #[error("{0}")]
    Detection(String),

    /// The schema or a tag in it is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The schema file could not be parsed.
    #[error("Invalid schema file: {0}")]
    Schema(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to appropriate exit code (see sysexits.h).
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Detection(_) => 1,
            Self::Schema(_) => 65, // EX_DATAERR
            Self::Io(_) => 74,     // EX_IOERR
            Self::Config(_) => 78, // EX_CONFIG
        }
    }
}

impl From<DetectError> for CliError {
    fn from(err: DetectError) -> Self {
        match err {
            DetectError::UnsupportedFieldKind { .. }
            | DetectError::InvalidEnvKey(_)
            | DetectError::UnknownTagOption(_)
            | DetectError::MalformedTag(_) => Self::Config(err.to_string()),
            other => Self::Detection(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Schema(err.to_string())
    }
}
