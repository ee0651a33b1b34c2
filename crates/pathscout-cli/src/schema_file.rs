//! JSON schema files.
//!
//! A schema file mirrors a directory declaration:
//!
//! ```json
//! {
//!   "tag": "",
//!   "fields": [
//!     { "name": "Path" },
//!     { "name": "Conf", "tag": "Key(CONF_DIR)", "fields": [
//!       { "name": "DitFile", "tag": "Ext(txt);Split(-)" }
//!     ]}
//!   ]
//! }
//! ```
//!
//! A field with `fields` is a directory; otherwise it is a string slot. An
//! explicit `type` other than `string` or `dir` is passed through so the
//! detector can reject it with a proper error.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use pathscout_core::{DirDecl, Field};

use crate::error::CliError;

/// Top-level schema document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// One declared field.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub fields: Option<Vec<FieldSpec>>,
}

impl SchemaFile {
    /// Read and parse a schema file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Convert into a declaration tree.
    pub fn to_decl(&self) -> DirDecl {
        DirDecl::new(self.fields.iter().map(FieldSpec::to_field).collect()).with_tag(self.tag.clone())
    }
}

impl FieldSpec {
    fn to_field(&self) -> Field {
        let field = match (&self.fields, self.kind.as_deref()) {
            (Some(children), None | Some("dir")) => {
                Field::dir(&self.name, children.iter().map(Self::to_field).collect())
            }
            (None, Some("dir")) => Field::dir(&self.name, Vec::new()),
            (None, None | Some("string")) => Field::string(&self.name),
            (_, Some(other)) => Field::other(&self.name, other),
        };
        field.with_tag(self.tag.clone())
    }
}
