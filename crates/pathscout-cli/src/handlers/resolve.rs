//! Resolve command handler.
//!
//! Loads a schema file, detects every declared path and prints the result
//! in `slot = path` form (or JSON).

use std::path::Path;

use anyhow::Result;

use pathscout_core::Resolution;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::schema_file::SchemaFile;

/// Execute the resolve command.
///
/// With `base`, the tree is resolved against that directory only; otherwise
/// the detector picks a base directory itself.
pub fn execute(ctx: &CliContext, schema: &Path, base: Option<&Path>, json: bool) -> Result<()> {
    let result = resolve_file(ctx, schema, base);
    print_traces(ctx);
    println!("{}", render(&result?, json)?);
    Ok(())
}

/// Load a schema file and resolve it.
pub fn resolve_file(ctx: &CliContext, schema: &Path, base: Option<&Path>) -> Result<Resolution, CliError> {
    let decl = SchemaFile::load(schema)?.to_decl();
    let resolution = match base {
        Some(root) => ctx.detector.detect_from(root, &decl),
        None => ctx.detector.detect(&decl),
    }?;
    tracing::debug!(slots = resolution.len(), root = %resolution.root.display(), "schema resolved");
    Ok(resolution)
}

/// Format a resolution for output.
pub fn render(resolution: &Resolution, json: bool) -> Result<String, CliError> {
    if json {
        Ok(serde_json::to_string_pretty(resolution)?)
    } else {
        Ok(resolution.to_string().trim_end().to_string())
    }
}

fn print_traces(ctx: &CliContext) {
    let Some(collector) = &ctx.traces else {
        return;
    };
    for trace in collector.drain() {
        eprintln!("{}\n", trace.render());
    }
}
