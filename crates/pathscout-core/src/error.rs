//! Detection error types.
//!
//! Schema-time errors (bad tags, unsupported declarations) and resolution-time
//! errors (missing paths, failed roots) share one enum so the driver can
//! aggregate them per base-directory attempt.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::base::SeedSource;

/// Errors that can occur while building or resolving a path schema.
#[derive(Debug, Error)]
pub enum DetectError {
    /// A declaration field has a type the schema cannot represent.
    #[error("Field '{field}' has unsupported kind '{kind}'; only directories and strings are allowed")]
    UnsupportedFieldKind { field: String, kind: String },

    /// An explicit `Key(...)` tag is not a legal environment variable name.
    #[error(
        "Invalid environment key '{0}': must contain only letters, digits or underscores and not start with a digit"
    )]
    InvalidEnvKey(String),

    /// A tag entry used a key outside the recognized option set.
    #[error("Unknown tag option '{0}'")]
    UnknownTagOption(String),

    /// A tag entry did not have the `Key(value)` shape.
    #[error("Malformed tag entry '{0}': expected `Key(value)`")]
    MalformedTag(String),

    /// An environment override is set but names a path that does not exist.
    #[error("Environment variable '{key}'='{}' does not point to an existing {kind}", .path.display())]
    EnvPathNotFound {
        key: String,
        path: PathBuf,
        kind: NodeKind,
    },

    /// No strategy produced an existing path.
    #[error("Cannot find the actual path of {kind} '{name}'")]
    PathNotFound { name: String, kind: NodeKind },

    /// A required child failed, aborting its parent.
    #[error("Failed to resolve {kind} '{child}' under '{parent}': {source}")]
    ChildFailed {
        parent: String,
        child: String,
        kind: NodeKind,
        #[source]
        source: Box<DetectError>,
    },

    /// The environment-seeded root was set but resolution against it failed.
    #[error("Cannot resolve from {key}={}: {source}", .root.display())]
    SeedFailed {
        key: String,
        root: PathBuf,
        #[source]
        source: Box<DetectError>,
    },

    /// Every candidate root failed.
    #[error("Cannot find the working directory, attempts: {}", format_attempts(.0))]
    NoBaseDir(Vec<FailedAttempt>),

    /// The locator produced no candidate roots at all.
    #[error("No candidate base directory could be determined")]
    NoCandidates,
}

/// Whether a node is a directory or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Directory => f.write_str("directory"),
            Self::File => f.write_str("file"),
        }
    }
}

/// A base directory that was tried and the reason it failed.
#[derive(Debug)]
pub struct FailedAttempt {
    pub source: SeedSource,
    pub root: PathBuf,
    pub error: DetectError,
}

fn format_attempts(attempts: &[FailedAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("{}={}: {}", a.source, a.root.display(), a.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias used throughout the crate.
pub type DetectResult<T> = Result<T, DetectError>;
