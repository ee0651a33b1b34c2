//! Explain command handler.
//!
//! Prints the resolution tree a schema file produces: derived names,
//! environment keys and output slots. Nothing on disk is inspected.

use std::path::Path;

use anyhow::Result;

use pathscout_core::{NodeKind, Schema};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{format_optional, print_separator};
use crate::schema_file::SchemaFile;

/// Execute the explain command.
pub fn execute(ctx: &CliContext, schema: &Path) -> Result<()> {
    let decl = SchemaFile::load(schema)?.to_decl();
    let schema = ctx.detector.schema(&decl).map_err(CliError::from)?;

    println!("{:<40} {:<36} SLOT", "NAME", "ENV KEY");
    print_separator(90);
    for line in tree_lines(&schema) {
        println!("{line}");
    }
    Ok(())
}

/// One formatted row per node, in resolution order.
pub fn tree_lines(schema: &Schema) -> Vec<String> {
    schema
        .walk()
        .into_iter()
        .map(|(depth, id)| {
            let node = schema.node(id);
            let mut name = format!("{}{}", "  ".repeat(depth), display_name(&node.name));
            if node.kind == NodeKind::Directory {
                name.push('/');
            }
            if node.is_optional() {
                name.push_str(" (optional)");
            }
            format!(
                "{name:<40} {:<36} {}",
                format_optional(node.env_key.as_deref(), "-"),
                format_optional(node.slot.as_deref(), "-"),
            )
        })
        .collect()
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "<base>" } else { name }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathscout_core::NamingConfig;

    #[test]
    fn test_tree_lines_show_keys_and_slots() {
        let decl = SchemaFile::parse(
            r#"{"fields":[{"name":"Path"},{"name":"Conf","fields":[
                {"name":"DitFile","tag":"Ext(txt);Split(-)"},
                {"name":"Extra","tag":"Opt()"}
            ]}]}"#,
        )
        .unwrap()
        .to_decl();
        let naming = NamingConfig {
            env_prefix: Some("ENV".to_string()),
            ..NamingConfig::default()
        };
        let schema = Schema::build(&decl, &naming).unwrap();
        let lines = tree_lines(&schema);

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ENV/"));
        assert!(lines[0].trim_end().ends_with("Path"));
        assert!(lines[1].starts_with("  conf/"));
        assert!(lines[2].contains("dit-file.txt"));
        assert!(lines[2].contains("ENV_CONF__DIT_FILE_TXT"));
        assert!(lines[3].contains("(optional)"));
    }
}
