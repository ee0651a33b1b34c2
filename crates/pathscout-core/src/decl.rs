//! Declaration trees.
//!
//! A declaration describes the layout a program expects: nested directories
//! and the string slots that receive resolved paths. Children are owned by
//! value, so a declaration can never refer back to one of its ancestors.
//!
//! ```
//! use pathscout_core::decl::{DirDecl, Field};
//!
//! let work = DirDecl::new(vec![
//!     Field::string("Path"),
//!     Field::dir("Conf", vec![
//!         Field::string("DitFile").with_tag("Ext(txt);Split(-)"),
//!         Field::string("DBConfigID").with_tag("Key(DB_CNF_ID)"),
//!     ])
//!     .with_tag("Key(CONF_DIR)"),
//!     Field::dir("Runtimes", vec![Field::string("Path")]),
//! ]);
//! assert_eq!(work.fields.len(), 3);
//! ```

use crate::resolution::Resolution;

/// What a declared field represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A nested directory with its own fields.
    Dir(Vec<Field>),
    /// A string slot: either the enclosing directory's path field or a file.
    Str,
    /// Anything else. Rejected when the schema is built.
    Other(String),
}

/// A named, optionally tagged field of a directory declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Identifier used for name inference and slot addressing.
    pub ident: String,
    /// Raw tag string, parsed when the schema is built.
    pub tag: String,
    pub kind: FieldKind,
}

impl Field {
    /// A string slot.
    pub fn string(ident: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            tag: String::new(),
            kind: FieldKind::Str,
        }
    }

    /// A nested directory.
    pub fn dir(ident: impl Into<String>, fields: Vec<Self>) -> Self {
        Self {
            ident: ident.into(),
            tag: String::new(),
            kind: FieldKind::Dir(fields),
        }
    }

    /// A field of an unsupported kind, kept so the builder can report it.
    pub fn other(ident: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            tag: String::new(),
            kind: FieldKind::Other(kind.into()),
        }
    }

    /// Attach a tag string such as `Ext(txt);Opt()`.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

/// The root of a declaration tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirDecl {
    /// Tag applied to the root directory.
    pub tag: String,
    pub fields: Vec<Field>,
}

impl DirDecl {
    pub const fn new(fields: Vec<Field>) -> Self {
        Self {
            tag: String::new(),
            fields,
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

/// A typed layout that can declare itself and receive resolved paths.
///
/// Slots are addressed by the dotted chain of field identifiers from the
/// root, e.g. `Conf.DitFile` or `Runtimes.Search.DIYPath`.
pub trait Layout {
    /// Describe the expected directory tree.
    fn declare() -> DirDecl;

    /// Copy resolved paths into the layout's fields.
    fn apply(&mut self, resolution: &Resolution);
}
