//! Base-directory candidates.
//!
//! Resolution order:
//! 1. The configured seed environment variable (if set). A root taken from
//!    the environment is authoritative: if it fails, nothing else is tried
//! 2. The directory containing the running executable
//! 3. The current working directory (covers `cargo run` from a checkout)

use std::env;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::probe::{EnvSource, Filesystem};

/// Where a candidate base directory came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedSource {
    /// Named environment variable.
    EnvVar(String),
    /// Directory of the current executable.
    Executable,
    /// Current working directory.
    WorkingDir,
    /// Supplied directly by the caller.
    Explicit,
}

impl fmt::Display for SeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvVar(key) => write!(f, "{key}"),
            Self::Executable => f.write_str("executable"),
            Self::WorkingDir => f.write_str("working-dir"),
            Self::Explicit => f.write_str("explicit"),
        }
    }
}

/// A base directory to try.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub source: SeedSource,
    pub root: PathBuf,
}

/// Candidate roots for one detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    /// The seed environment variable is set; use only this root.
    Env(Candidate),
    /// Try each root in order.
    Fallbacks(Vec<Candidate>),
}

/// Determine the candidate base directories.
pub fn locate(dir_env_key: Option<&str>, env: &dyn EnvSource, fs: &dyn Filesystem) -> Seed {
    if let Some(key) = dir_env_key {
        if let Some(value) = env.var(key).filter(|v| !v.is_empty()) {
            tracing::debug!(key, root = %value, "base directory from environment");
            return Seed::Env(Candidate {
                source: SeedSource::EnvVar(key.to_string()),
                root: PathBuf::from(value),
            });
        }
    }

    let mut candidates = Vec::with_capacity(2);
    if let Some(root) = executable_dir().filter(|p| fs.is_dir(p)) {
        candidates.push(Candidate {
            source: SeedSource::Executable,
            root,
        });
    }
    if let Some(root) = env::current_dir().ok().filter(|p| fs.is_dir(p)) {
        candidates.push(Candidate {
            source: SeedSource::WorkingDir,
            root,
        });
    }
    Seed::Fallbacks(candidates)
}

fn executable_dir() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    exe.parent().map(PathBuf::from)
}
