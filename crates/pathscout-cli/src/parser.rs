//! Main CLI parser and top-level argument handling.
//!
//! Global options configure the detector; every one of them can also come
//! from the environment (or a `.env` file loaded at startup).

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface definition for the path detector.
#[derive(Parser)]
#[command(name = "pathscout")]
#[command(about = "Locate declared directories and files across deployment layouts")]
#[command(version)]
pub struct Cli {
    /// Prefix for derived environment keys; also names the root directory
    #[arg(long, global = true, env = "PATHSCOUT_PREFIX")]
    pub prefix: Option<String>,

    /// Environment variable that pins the base directory
    #[arg(long = "dir-env-key", global = true, env = "PATHSCOUT_DIR_ENV_KEY")]
    pub dir_env_key: Option<String>,

    /// Separator for inferred file names
    #[arg(long = "file-split", global = true, default_value = ".")]
    pub file_split: String,

    /// Separator for inferred directory names
    #[arg(long = "dir-split", global = true, default_value = ".")]
    pub dir_split: String,

    /// Print the search order of every node while resolving
    #[arg(long, global = true)]
    pub debug: bool,

    /// Enable verbose/debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
