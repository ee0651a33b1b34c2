//! Command handlers.
//!
//! Each handler owns one subcommand and reports failures as [`CliError`]
//! so `main` can map them to exit codes.
//!
//! [`CliError`]: crate::error::CliError

pub mod explain;
pub mod resolve;
pub mod split;
