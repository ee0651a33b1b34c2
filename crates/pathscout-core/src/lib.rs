//! Schema-driven filesystem path detection.
//!
//! Describe the directories and files a program expects with a
//! [`DirDecl`], and [`Detector`] works out where each one actually lives:
//!
//! - Names are inferred from identifiers (`DBConfigID` → `db.config.id`)
//! - Every node can be overridden through an environment variable whose
//!   name is derived from its position (`${PREFIX}_${DIR}__${FILE}`)
//! - Tags add explicit names, extensions, priority search paths and
//!   optional nodes
//! - The base directory comes from an environment variable, the executable's
//!   directory or the working directory, first success wins
//!
//! # Design
//!
//! - The declaration is plain data; the resolution tree is an arena rebuilt
//!   for every base-directory attempt
//! - Resolution produces a [`Resolution`] map; callers write it back
//!   explicitly (see [`Layout`])
//! - Filesystem, environment and trace output are injected ports

#![deny(unused_crate_dependencies)]

pub mod base;
pub mod decl;
pub mod detector;
pub mod error;
pub mod naming;
pub mod probe;
pub mod resolution;
pub mod resolver;
pub mod schema;
pub mod tag;
pub mod trace;

#[cfg(test)]
mod test_utils;

// Re-export public API
pub use base::{Candidate, Seed, SeedSource};
pub use decl::{DirDecl, Field, FieldKind, Layout};
pub use detector::Detector;
pub use error::{DetectError, DetectResult, FailedAttempt, NodeKind};
pub use naming::{infer_name, split_name, to_env_key};
pub use probe::{EnvSource, Filesystem, ProcessEnv, RealFilesystem};
pub use resolution::Resolution;
pub use resolver::Resolver;
pub use schema::{NamingConfig, Node, NodeId, Schema};
pub use tag::{KeyTag, Tag};
pub use trace::{NodeTrace, SearchStep, TraceCollector, TraceSink, TracingSink};
