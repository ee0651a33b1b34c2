//! Resolution tree construction.
//!
//! [`Schema::build`] walks a [`DirDecl`] once and produces an arena of
//! directory and file nodes. Each node carries its derived name, its
//! environment key and the tag that drives resolution. Parents are referenced
//! by index, children by ordered id lists.

use std::path::{Path, PathBuf};

use crate::decl::{DirDecl, Field, FieldKind};
use crate::error::{DetectError, DetectResult, NodeKind};
use crate::naming::{infer_name, to_env_key};
use crate::tag::{KeyTag, Tag};

/// Naming configuration shared by every node of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConfig {
    /// Global prefix: root directory name and first environment key segment.
    pub env_prefix: Option<String>,
    /// Separator for inferred directory names.
    pub dir_split: String,
    /// Separator for inferred file names.
    pub file_split: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            env_prefix: None,
            dir_split: ".".to_string(),
            file_split: ".".to_string(),
        }
    }
}

/// Index of a node in its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: Self = Self(0);
}

/// A directory or file in the resolution tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Derived on-disk name, extension included.
    pub name: String,
    /// Dotted identifier chain from the root; empty for the root.
    pub field: String,
    /// Environment variable consulted first, if any.
    pub env_key: Option<String>,
    pub parent: Option<NodeId>,
    pub tag: Tag,
    /// Output slot receiving the resolved path.
    pub slot: Option<String>,
    /// Child files, in declaration order.
    pub files: Vec<NodeId>,
    /// Child directories, in declaration order.
    pub dirs: Vec<NodeId>,
    path: Option<PathBuf>,
}

impl Node {
    /// Resolved path, once set.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.tag.opt
    }
}

/// The resolution tree for one detection attempt.
#[derive(Debug, Clone)]
pub struct Schema {
    nodes: Vec<Node>,
}

impl Schema {
    /// Build the resolution tree for `decl`.
    ///
    /// Fails on unparsable tags and on fields that are neither directories
    /// nor strings.
    pub fn build(decl: &DirDecl, naming: &NamingConfig) -> DetectResult<Self> {
        let mut schema = Self { nodes: Vec::new() };
        let tag = Tag::parse(&decl.tag)?;
        schema.add_dir(None, "", tag, &decl.fields, naming)?;
        Ok(schema)
    }

    pub fn root(&self) -> &Node {
        self.node(NodeId::ROOT)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes ever created, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Set a node's path. A path that is already set is never replaced.
    pub fn set_path(&mut self, id: NodeId, path: PathBuf) -> bool {
        let node = &mut self.nodes[id.0];
        if node.path.is_some() {
            return false;
        }
        node.path = Some(path);
        true
    }

    /// Remove `child` from `parent`'s child lists.
    pub(crate) fn detach(&mut self, parent: NodeId, child: NodeId) {
        let parent = &mut self.nodes[parent.0];
        parent.files.retain(|id| *id != child);
        parent.dirs.retain(|id| *id != child);
    }

    /// Nodes reachable from the root, depth-first, files before directories.
    pub fn walk(&self) -> Vec<(usize, NodeId)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.walk_from(NodeId::ROOT, 0, &mut out);
        out
    }

    fn walk_from(&self, id: NodeId, depth: usize, out: &mut Vec<(usize, NodeId)>) {
        out.push((depth, id));
        let node = self.node(id);
        for child in &node.files {
            out.push((depth + 1, *child));
        }
        for child in &node.dirs {
            self.walk_from(*child, depth + 1, out);
        }
    }

    fn add_dir(
        &mut self,
        parent: Option<NodeId>,
        ident: &str,
        tag: Tag,
        fields: &[Field],
        naming: &NamingConfig,
    ) -> DetectResult<NodeId> {
        let name = match (&tag.name, parent, &naming.env_prefix) {
            (Some(name), _, _) => name.clone(),
            (None, None, Some(prefix)) if !prefix.is_empty() => prefix.clone(),
            (None, _, _) => {
                let split = tag.split.as_deref().unwrap_or(&naming.dir_split);
                infer_name(ident, split, tag.ext.as_deref()).unwrap_or_else(|| ident.to_string())
            }
        };
        let field = self.field_path(parent, ident);
        let env_key = self.env_key(parent, &name, NodeKind::Directory, &tag.key, naming);

        let id = self.push(Node {
            kind: NodeKind::Directory,
            name,
            field,
            env_key,
            parent,
            tag,
            slot: None,
            files: Vec::with_capacity(fields.len()),
            dirs: Vec::with_capacity(fields.len()),
            path: None,
        });

        for child in fields {
            match &child.kind {
                FieldKind::Dir(grandchildren) => {
                    let tag = Tag::parse(&child.tag)?;
                    let dir = self.add_dir(Some(id), &child.ident, tag, grandchildren, naming)?;
                    self.nodes[id.0].dirs.push(dir);
                }
                FieldKind::Str if child.ident == self.nodes[id.0].tag.path => {
                    self.nodes[id.0].slot = Some(self.field_path(Some(id), &child.ident));
                }
                FieldKind::Str => {
                    let tag = Tag::parse(&child.tag)?;
                    let file = self.add_file(id, &child.ident, tag, naming);
                    self.nodes[id.0].files.push(file);
                }
                FieldKind::Other(kind) => {
                    return Err(DetectError::UnsupportedFieldKind {
                        field: self.field_path(Some(id), &child.ident),
                        kind: kind.clone(),
                    });
                }
            }
        }

        Ok(id)
    }

    fn add_file(&mut self, parent: NodeId, ident: &str, tag: Tag, naming: &NamingConfig) -> NodeId {
        let name = tag.name.clone().unwrap_or_else(|| {
            let split = tag.split.as_deref().unwrap_or(&naming.file_split);
            infer_name(ident, split, tag.ext.as_deref()).unwrap_or_else(|| ident.to_string())
        });
        let field = self.field_path(Some(parent), ident);
        let env_key = self.env_key(Some(parent), &name, NodeKind::File, &tag.key, naming);

        self.push(Node {
            kind: NodeKind::File,
            name,
            slot: Some(field.clone()),
            field,
            env_key,
            parent: Some(parent),
            tag,
            files: Vec::new(),
            dirs: Vec::new(),
            path: None,
        })
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn field_path(&self, parent: Option<NodeId>, ident: &str) -> String {
        match parent.map(|p| self.node(p).field.as_str()) {
            Some(prefix) if !prefix.is_empty() => format!("{prefix}.{ident}"),
            _ => ident.to_string(),
        }
    }

    /// Environment key for a node about to be added under `parent`.
    ///
    /// Derived keys follow `${PREFIX}_${DIR1}_${DIR2}` for directories and
    /// `${PREFIX}_${DIR1}__${FILE}` for files. Names are collected from the
    /// node upwards, the prefix appended last, and the list reversed before
    /// joining. The root contributes only through the prefix.
    fn env_key(
        &self,
        parent: Option<NodeId>,
        name: &str,
        kind: NodeKind,
        key: &KeyTag,
        naming: &NamingConfig,
    ) -> Option<String> {
        match key {
            KeyTag::Explicit(key) => return Some(key.clone()),
            KeyTag::Disabled => return None,
            KeyTag::Derive => {}
        }

        let mut parts: Vec<&str> = Vec::with_capacity(8);
        if kind == NodeKind::Directory && parent.is_some() && !name.is_empty() {
            parts.push(name);
        }
        let mut cursor = parent;
        while let Some(id) = cursor {
            let node = self.node(id);
            if node.parent.is_some() && !node.name.is_empty() {
                parts.push(&node.name);
            }
            cursor = node.parent;
        }
        if let Some(prefix) = naming.env_prefix.as_deref().filter(|p| !p.is_empty()) {
            parts.push(prefix);
        }
        parts.reverse();

        if kind == NodeKind::File {
            parts.push("");
            parts.push(name);
        }
        if parts.is_empty() {
            return None;
        }
        Some(to_env_key(&parts.join("_").to_uppercase()))
    }
}
