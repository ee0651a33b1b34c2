//! CLI bootstrap - composition root for the CLI adapter.
//!
//! Turns parsed global options into a configured [`Detector`]. Handlers only
//! see the resulting [`CliContext`].

use std::sync::Arc;

use pathscout_core::{Detector, TraceCollector};

use crate::parser::Cli;

/// Detector settings taken from global CLI options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub prefix: Option<String>,
    pub dir_env_key: Option<String>,
    pub file_split: String,
    pub dir_split: String,
    /// Collect and print the search order of every node.
    pub debug: bool,
}

impl CliConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            prefix: cli.prefix.clone().filter(|p| !p.is_empty()),
            dir_env_key: cli.dir_env_key.clone().filter(|k| !k.is_empty()),
            file_split: cli.file_split.clone(),
            dir_split: cli.dir_split.clone(),
            debug: cli.debug,
        }
    }
}

/// Everything a handler needs.
pub struct CliContext {
    pub detector: Detector,
    /// Present when `--debug` was given.
    pub traces: Option<Arc<TraceCollector>>,
}

/// Build the CLI context from configuration.
pub fn bootstrap(config: CliConfig) -> CliContext {
    let mut detector = Detector::new()
        .with_file_split(config.file_split)
        .with_dir_split(config.dir_split);
    if let Some(prefix) = config.prefix {
        detector = detector.with_env_prefix(prefix);
    }
    if let Some(key) = config.dir_env_key {
        detector = detector.with_dir_env_key(key);
    }

    let traces = config.debug.then(|| Arc::new(TraceCollector::new()));
    if let Some(collector) = &traces {
        detector = detector.with_trace(collector.clone());
    }

    tracing::debug!(?detector, "detector configured");
    CliContext { detector, traces }
}
