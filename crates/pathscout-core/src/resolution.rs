//! Resolved output slots.
//!
//! A [`Resolution`] is produced only after a whole tree resolves. It maps each
//! output slot of the final tree to its path; pruned optional nodes and
//! directories without a path field contribute nothing.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::base::SeedSource;
use crate::schema::Schema;

/// All resolved paths of one successful detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// The base directory the tree was resolved against.
    pub root: PathBuf,
    /// Where the base directory came from.
    pub source: SeedSource,
    slots: BTreeMap<String, PathBuf>,
    pruned: Vec<String>,
}

impl Resolution {
    /// Collect the slots of every node still attached to the tree.
    pub fn collect(schema: &Schema, source: SeedSource, pruned: Vec<String>) -> Self {
        let slots = schema
            .walk()
            .into_iter()
            .map(|(_, id)| schema.node(id))
            .filter_map(|node| Some((node.slot.clone()?, node.path()?.to_path_buf())))
            .collect();

        Self {
            root: schema.root().path().map(Path::to_path_buf).unwrap_or_default(),
            source,
            slots,
            pruned,
        }
    }

    /// Path resolved for a slot such as `Conf.DitFile`.
    pub fn get(&self, slot: &str) -> Option<&Path> {
        self.slots.get(slot).map(PathBuf::as_path)
    }

    /// Like [`get`](Self::get), as an owned string; empty when unresolved.
    pub fn get_string(&self, slot: &str) -> String {
        self.get(slot)
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Iterate `(slot, path)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    /// Fields of optional nodes removed because they could not be found.
    pub fn pruned(&self) -> &[String] {
        &self.pruned
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# root = {} ({})", self.root.display(), self.source)?;
        for (slot, path) in &self.slots {
            writeln!(f, "{slot} = {}", path.display())?;
        }
        for field in &self.pruned {
            writeln!(f, "# {field} = (optional, not found)")?;
        }
        Ok(())
    }
}
