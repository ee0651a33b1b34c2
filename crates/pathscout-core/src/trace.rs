//! Search traces.
//!
//! When a trace sink is attached to a detector, every resolved (or failed)
//! child node produces a [`NodeTrace`] listing the strategies that apply to
//! it, in the order they are tried, with concrete paths. Traces never affect
//! resolution.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::Serialize;

use crate::error::NodeKind;

/// One strategy considered for a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum SearchStep {
    /// Read the path from an environment variable.
    Env { key: String },
    /// Check a priority location.
    Priority { path: PathBuf },
    /// Join the parent's resolved path with the node name.
    Parent { path: PathBuf },
}

/// Description of how a single node was searched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeTrace {
    pub field: String,
    pub name: String,
    pub kind: NodeKind,
    pub steps: Vec<SearchStep>,
    /// The resolved path, or `None` if the node failed.
    pub resolved: Option<PathBuf>,
    pub error: Option<String>,
}

impl NodeTrace {
    /// Human-readable, numbered description of the search.
    ///
    /// Priority entries share one number and are sub-numbered.
    pub fn render(&self) -> String {
        let mut out = format!("{} '{}' search order:", self.kind, self.name);
        let mut index = 0;
        let mut in_priority = false;

        for step in &self.steps {
            match step {
                SearchStep::Env { key } => {
                    index += 1;
                    in_priority = false;
                    let _ = write!(
                        out,
                        "\n{index}. environment variable '{key}', returned immediately if the {} exists",
                        self.kind
                    );
                }
                SearchStep::Priority { path } => {
                    if !in_priority {
                        index += 1;
                        in_priority = true;
                        let _ = write!(out, "\n{index}. priority paths:");
                    }
                    let _ = write!(out, "\n   - '{}'", path.display());
                }
                SearchStep::Parent { path } => {
                    index += 1;
                    in_priority = false;
                    let _ = write!(out, "\n{index}. parent directory '{}'", path.display());
                }
            }
        }

        match (&self.resolved, &self.error) {
            (Some(path), _) => {
                let _ = write!(out, "\n=> {}", path.display());
            }
            (None, Some(err)) => {
                let _ = write!(out, "\n=> failed: {err}");
            }
            (None, None) => {}
        }
        out
    }
}

/// Receiver of search traces.
pub trait TraceSink: Send + Sync {
    fn record(&self, trace: &NodeTrace);
}

/// Collects traces in memory.
#[derive(Debug, Default)]
pub struct TraceCollector {
    traces: Mutex<Vec<NodeTrace>>,
}

impl TraceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every trace recorded so far.
    pub fn drain(&self) -> Vec<NodeTrace> {
        self.traces
            .lock()
            .map(|mut traces| std::mem::take(&mut *traces))
            .unwrap_or_default()
    }
}

impl TraceSink for TraceCollector {
    fn record(&self, trace: &NodeTrace) {
        if let Ok(mut traces) = self.traces.lock() {
            traces.push(trace.clone());
        }
    }
}

/// Forwards rendered traces to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&self, trace: &NodeTrace) {
        tracing::debug!(field = %trace.field, "\n{}", trace.render());
    }
}
