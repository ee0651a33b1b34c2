//! Depth-first path resolution over a [`Schema`].
//!
//! Each node's own path is decided before its children are visited, since
//! children join onto it. Resolution order per node:
//! 1. Environment variable named by the node's key (if set and non-empty);
//!    a missing target fails the node outright
//! 2. Priority paths, in tag order
//! 3. Parent path joined with the node name
//!
//! Children are resolved files first, then directories. Optional children
//! that fail are detached from the tree; required ones fail the parent.

use std::path::{Path, PathBuf};

use crate::error::{DetectError, DetectResult, NodeKind};
use crate::probe::{EnvSource, Filesystem, expand_home};
use crate::schema::{Node, NodeId, Schema};
use crate::trace::{NodeTrace, SearchStep, TraceSink};

/// Resolves a schema against a filesystem and an environment.
pub struct Resolver<'a> {
    fs: &'a dyn Filesystem,
    env: &'a dyn EnvSource,
    trace: Option<&'a dyn TraceSink>,
}

impl<'a> Resolver<'a> {
    pub fn new(fs: &'a dyn Filesystem, env: &'a dyn EnvSource) -> Self {
        Self {
            fs,
            env,
            trace: None,
        }
    }

    #[must_use]
    pub fn with_trace(mut self, sink: &'a dyn TraceSink) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Resolve every node reachable from the root.
    ///
    /// Returns the fields of optional nodes that were pruned.
    pub fn resolve(&self, schema: &mut Schema) -> DetectResult<Vec<String>> {
        let mut pruned = Vec::new();
        self.resolve_node(schema, NodeId::ROOT, &mut pruned)?;
        Ok(pruned)
    }

    fn resolve_node(
        &self,
        schema: &mut Schema,
        id: NodeId,
        pruned: &mut Vec<String>,
    ) -> DetectResult<()> {
        if schema.node(id).path().is_none() {
            let path = self.locate(schema, id)?;
            tracing::trace!(field = %schema.node(id).field, path = %path.display(), "resolved");
            schema.set_path(id, path);
        }

        let node = schema.node(id);
        let children: Vec<NodeId> = node.files.iter().chain(&node.dirs).copied().collect();
        for child in children {
            self.resolve_child(schema, id, child, pruned)?;
        }
        Ok(())
    }

    fn resolve_child(
        &self,
        schema: &mut Schema,
        parent: NodeId,
        child: NodeId,
        pruned: &mut Vec<String>,
    ) -> DetectResult<()> {
        let result = self.resolve_node(schema, child, pruned);
        if let Some(sink) = self.trace {
            sink.record(&describe(schema, child, &result));
        }

        let Err(err) = result else {
            return Ok(());
        };
        let node = schema.node(child);
        if node.is_optional() {
            tracing::debug!(field = %node.field, error = %err, "optional node not found, skipping");
            pruned.push(node.field.clone());
            schema.detach(parent, child);
            return Ok(());
        }
        Err(DetectError::ChildFailed {
            parent: schema.node(parent).name.clone(),
            child: node.name.clone(),
            kind: node.kind,
            source: Box::new(err),
        })
    }

    fn locate(&self, schema: &Schema, id: NodeId) -> DetectResult<PathBuf> {
        let node = schema.node(id);
        for step in plan(schema, node) {
            match step {
                SearchStep::Env { key } => {
                    let Some(value) = self.env.var(&key).filter(|v| !v.is_empty()) else {
                        continue;
                    };
                    let path = PathBuf::from(value);
                    if self.exists(node.kind, &path) {
                        return Ok(path);
                    }
                    return Err(DetectError::EnvPathNotFound {
                        key,
                        path,
                        kind: node.kind,
                    });
                }
                SearchStep::Priority { path } | SearchStep::Parent { path } => {
                    if self.exists(node.kind, &path) {
                        return Ok(path);
                    }
                }
            }
        }
        Err(DetectError::PathNotFound {
            name: node.name.clone(),
            kind: node.kind,
        })
    }

    fn exists(&self, kind: NodeKind, path: &Path) -> bool {
        match kind {
            NodeKind::Directory => self.fs.is_dir(path),
            NodeKind::File => self.fs.is_file(path),
        }
    }
}

/// Strategies applicable to `node`, in evaluation order.
///
/// A priority entry is the candidate directory itself for directories, and
/// `entry/name` for files.
pub fn plan(schema: &Schema, node: &Node) -> Vec<SearchStep> {
    let mut steps = Vec::with_capacity(node.tag.priority.len() + 2);
    if let Some(key) = &node.env_key {
        steps.push(SearchStep::Env { key: key.clone() });
    }
    for entry in &node.tag.priority {
        let entry = expand_home(entry);
        let path = match node.kind {
            NodeKind::Directory => entry,
            NodeKind::File => entry.join(&node.name),
        };
        steps.push(SearchStep::Priority { path });
    }
    if let Some(parent) = node.parent.and_then(|p| schema.node(p).path()) {
        steps.push(SearchStep::Parent {
            path: parent.join(&node.name),
        });
    }
    steps
}

fn describe(schema: &Schema, id: NodeId, result: &DetectResult<()>) -> NodeTrace {
    let node = schema.node(id);
    NodeTrace {
        field: node.field.clone(),
        name: node.name.clone(),
        kind: node.kind,
        steps: plan(schema, node),
        resolved: result
            .as_ref()
            .ok()
            .and_then(|_| node.path().map(Path::to_path_buf)),
        error: result.as_ref().err().map(ToString::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decl::{DirDecl, Field};
    use crate::probe::{MockFilesystem, RealFilesystem};
    use crate::schema::NamingConfig;
    use crate::test_utils::{TempLayout, sample_work};
    use crate::trace::TraceCollector;
    use std::collections::HashMap;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    fn schema_at(decl: &DirDecl, root: &Path) -> Schema {
        let mut schema = Schema::build(decl, &NamingConfig::default()).unwrap();
        schema.set_path(NodeId::ROOT, root.to_path_buf());
        schema
    }

    fn field_path<'a>(schema: &'a Schema, field: &str) -> Option<&'a Path> {
        schema
            .walk()
            .into_iter()
            .map(|(_, id)| schema.node(id))
            .find(|n| n.field == field)
            .and_then(Node::path)
    }

    #[test]
    fn test_untagged_directory_joins_parent() {
        let layout = TempLayout::new().dir("runtimes/log");
        let decl = DirDecl::new(vec![Field::dir(
            "Runtimes",
            vec![Field::string("Path"), Field::dir("Log", vec![Field::string("Path")])],
        )]);
        let mut schema = schema_at(&decl, layout.root());

        Resolver::new(&RealFilesystem, &no_env()).resolve(&mut schema).unwrap();

        assert_eq!(
            field_path(&schema, "Runtimes.Log"),
            Some(layout.root().join("runtimes").join("log").as_path())
        );
    }

    #[test]
    fn test_env_override_wins() {
        let layout = TempLayout::new().dir("conf").dir("elsewhere");
        let decl = DirDecl::new(vec![Field::dir("Conf", vec![]).with_tag("Key(MY_CONF)")]);
        let mut schema = schema_at(&decl, layout.root());

        let target = layout.root().join("elsewhere");
        let env = HashMap::from([("MY_CONF".to_string(), target.display().to_string())]);
        Resolver::new(&RealFilesystem, &env).resolve(&mut schema).unwrap();

        assert_eq!(field_path(&schema, "Conf"), Some(target.as_path()));
    }

    #[test]
    fn test_env_override_missing_short_circuits() {
        // Priority and parent candidates both exist, but must not be consulted.
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir()
            .returning(|p| p != Path::new("/missing"));
        let decl = DirDecl::new(vec![
            Field::dir("Conf", vec![]).with_tag("Key(MY_CONF);Priority(/etc/app)"),
        ]);
        let mut schema = schema_at(&decl, Path::new("/work"));
        let env = HashMap::from([("MY_CONF".to_string(), "/missing".to_string())]);

        let err = Resolver::new(&fs, &env).resolve(&mut schema).unwrap_err();
        match err {
            DetectError::ChildFailed { source, .. } => assert!(matches!(
                *source,
                DetectError::EnvPathNotFound { ref key, .. } if key == "MY_CONF"
            )),
            other => panic!("expected ChildFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_env_value_falls_through() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|p| p == Path::new("/work/conf"));
        let decl = DirDecl::new(vec![Field::dir("Conf", vec![]).with_tag("Key(MY_CONF)")]);
        let mut schema = schema_at(&decl, Path::new("/work"));
        let env = HashMap::from([("MY_CONF".to_string(), String::new())]);

        Resolver::new(&fs, &env).resolve(&mut schema).unwrap();
        assert_eq!(field_path(&schema, "Conf"), Some(Path::new("/work/conf")));
    }

    #[test]
    fn test_priority_paths_in_order() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_file().returning(|p| {
            p == Path::new("/srv/b/log.id.file") || p == Path::new("/srv/c/log.id.file")
        });
        let decl = DirDecl::new(vec![
            Field::string("LogID").with_tag("Ext(file);Priority(/srv/a|/srv/b|/srv/c)"),
        ]);
        let mut schema = schema_at(&decl, Path::new("/work"));

        Resolver::new(&fs, &no_env())
            .resolve(&mut schema)
            .unwrap();
        assert_eq!(
            field_path(&schema, "LogID"),
            Some(Path::new("/srv/b/log.id.file"))
        );
    }

    #[test]
    fn test_directory_priority_uses_bare_path() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().returning(|p| p == Path::new("/run/data"));
        let decl = DirDecl::new(vec![Field::dir("Data", vec![]).with_tag("Priority(/run/data)")]);
        let mut schema = schema_at(&decl, Path::new("/work"));

        Resolver::new(&fs, &no_env())
            .resolve(&mut schema)
            .unwrap();
        assert_eq!(field_path(&schema, "Data"), Some(Path::new("/run/data")));
    }

    #[test]
    fn test_optional_file_is_pruned() {
        let layout = TempLayout::new().dir("document");
        let decl = DirDecl::new(vec![Field::dir(
            "Document",
            vec![Field::string("Path"), Field::string("OptFile").with_tag("Opt()")],
        )]);
        let mut schema = schema_at(&decl, layout.root());

        let pruned = Resolver::new(&RealFilesystem, &no_env())
            .resolve(&mut schema)
            .unwrap();

        assert_eq!(pruned, vec!["Document.OptFile".to_string()]);
        let document = schema
            .walk()
            .into_iter()
            .map(|(_, id)| schema.node(id))
            .find(|n| n.field == "Document")
            .unwrap();
        assert!(document.files.is_empty());
    }

    #[test]
    fn test_required_file_fails_parent() {
        let layout = TempLayout::new().dir("document");
        let decl = DirDecl::new(vec![Field::dir(
            "Document",
            vec![Field::string("Path"), Field::string("ReqFile")],
        )]);
        let mut schema = schema_at(&decl, layout.root());

        let err = Resolver::new(&RealFilesystem, &no_env())
            .resolve(&mut schema)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'document'"), "{msg}");
        assert!(msg.contains("'req.file'"), "{msg}");
    }

    #[test]
    fn test_optional_directory_subtree_is_pruned() {
        let layout = TempLayout::new().dir("search");
        let decl = DirDecl::new(vec![Field::dir(
            "Search",
            vec![
                Field::string("Path"),
                Field::dir("Post", vec![Field::string("Path")]).with_tag("Opt()"),
            ],
        )]);
        let mut schema = schema_at(&decl, layout.root());

        let pruned = Resolver::new(&RealFilesystem, &no_env())
            .resolve(&mut schema)
            .unwrap();
        assert_eq!(pruned, vec!["Search.Post".to_string()]);
        assert_eq!(field_path(&schema, "Search.Post"), None);
    }

    #[test]
    fn test_preset_root_is_kept() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_dir().never();
        let mut schema = schema_at(&DirDecl::new(vec![Field::string("Path")]), Path::new("/base"));

        Resolver::new(&fs, &no_env())
            .resolve(&mut schema)
            .unwrap();
        assert_eq!(schema.root().path(), Some(Path::new("/base")));
    }

    #[test]
    fn test_trace_records_each_child() {
        let layout = sample_layout();
        let mut schema = schema_at(&sample_work(), layout.root());
        let collector = TraceCollector::new();

        Resolver::new(&RealFilesystem, &no_env())
            .with_trace(&collector)
            .resolve(&mut schema)
            .unwrap();

        let traces = collector.drain();
        let opt = traces
            .iter()
            .find(|t| t.field == "Runtimes.Search.Document.OptFile")
            .unwrap();
        assert!(opt.resolved.is_none());
        assert!(opt.error.is_some());
        assert!(matches!(opt.steps.last(), Some(SearchStep::Parent { .. })));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let layout = sample_layout();
        let resolve = || {
            let mut schema = schema_at(&sample_work(), layout.root());
            Resolver::new(&RealFilesystem, &no_env())
                .resolve(&mut schema)
                .unwrap();
            schema
                .walk()
                .into_iter()
                .map(|(_, id)| schema.node(id).path().map(Path::to_path_buf))
                .collect::<Vec<_>>()
        };
        assert_eq!(resolve(), resolve());
    }

    fn sample_layout() -> TempLayout {
        TempLayout::new()
            .file("conf/dit-file.txt")
            .file("conf/db.config.id")
            .file("conf/log.id.file")
            .dir("runtimes/log")
            .dir("runtimes/search/document")
            .dir("runtimes/search/post")
    }
}
