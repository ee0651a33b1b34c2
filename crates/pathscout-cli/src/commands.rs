//! Available subcommands.

use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve every path declared in a schema file
    Resolve {
        /// JSON schema file describing the expected layout
        schema: PathBuf,
        /// Resolve against this directory instead of locating one
        #[arg(long)]
        base: Option<PathBuf>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show derived names and environment keys without touching the filesystem
    Explain {
        /// JSON schema file describing the expected layout
        schema: PathBuf,
    },

    /// Show how identifiers are split into name tokens
    Split {
        /// Identifiers to split
        #[arg(required = true)]
        idents: Vec<String>,
    },
}
