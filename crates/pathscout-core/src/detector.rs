//! Detection driver.
//!
//! [`Detector`] holds the naming configuration and the injected ports, picks
//! candidate base directories and resolves a fresh copy of the schema against
//! each one until a root succeeds.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::base::{self, Candidate, Seed, SeedSource};
use crate::decl::{DirDecl, Layout};
use crate::error::{DetectError, DetectResult, FailedAttempt};
use crate::probe::{EnvSource, Filesystem, ProcessEnv, RealFilesystem};
use crate::resolution::Resolution;
use crate::resolver::Resolver;
use crate::schema::{NamingConfig, NodeId, Schema};
use crate::trace::{TraceSink, TracingSink};

/// Configured path detector.
///
/// ```no_run
/// use pathscout_core::{Detector, DirDecl, Field};
///
/// let decl = DirDecl::new(vec![
///     Field::string("Path"),
///     Field::dir("Conf", vec![Field::string("AppConfig").with_tag("Ext(toml)")]),
/// ]);
/// let paths = Detector::new()
///     .with_env_prefix("APP")
///     .with_dir_env_key("APP_DIR")
///     .detect(&decl)?;
/// println!("{}", paths.get_string("Conf.AppConfig"));
/// # Ok::<(), pathscout_core::DetectError>(())
/// ```
#[derive(Clone)]
pub struct Detector {
    naming: NamingConfig,
    dir_env_key: Option<String>,
    fs: Arc<dyn Filesystem>,
    env: Arc<dyn EnvSource>,
    trace: Option<Arc<dyn TraceSink>>,
}

impl Default for Detector {
    fn default() -> Self {
        Self {
            naming: NamingConfig::default(),
            dir_env_key: None,
            fs: Arc::new(RealFilesystem),
            env: Arc::new(ProcessEnv),
            trace: None,
        }
    }
}

impl fmt::Debug for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detector")
            .field("naming", &self.naming)
            .field("dir_env_key", &self.dir_env_key)
            .field("trace", &self.trace.is_some())
            .finish_non_exhaustive()
    }
}

impl Detector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix for every derived environment key; also names the root.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.naming.env_prefix = Some(prefix.into()).filter(|p: &String| !p.is_empty());
        self
    }

    /// Separator for inferred file names (default `.`).
    #[must_use]
    pub fn with_file_split(mut self, split: impl Into<String>) -> Self {
        self.naming.file_split = split.into();
        self
    }

    /// Separator for inferred directory names (default `.`).
    #[must_use]
    pub fn with_dir_split(mut self, split: impl Into<String>) -> Self {
        self.naming.dir_split = split.into();
        self
    }

    /// Environment variable that, when set, is the only base directory tried.
    #[must_use]
    pub fn with_dir_env_key(mut self, key: impl Into<String>) -> Self {
        self.dir_env_key = Some(key.into()).filter(|k: &String| !k.is_empty());
        self
    }

    #[must_use]
    pub fn with_trace(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Log every node's search order through `tracing` at debug level.
    #[must_use]
    pub fn debug(self) -> Self {
        self.with_trace(Arc::new(TracingSink))
    }

    #[must_use]
    pub fn with_env_source(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = env;
        self
    }

    #[must_use]
    pub fn with_filesystem(mut self, fs: Arc<dyn Filesystem>) -> Self {
        self.fs = fs;
        self
    }

    pub const fn naming(&self) -> &NamingConfig {
        &self.naming
    }

    /// Build the resolution tree without touching the filesystem.
    pub fn schema(&self, decl: &DirDecl) -> DetectResult<Schema> {
        Schema::build(decl, &self.naming)
    }

    /// Detect paths, choosing the base directory automatically.
    pub fn detect(&self, decl: &DirDecl) -> DetectResult<Resolution> {
        let template = self.schema(decl)?;

        match base::locate(self.dir_env_key.as_deref(), self.env.as_ref(), self.fs.as_ref()) {
            Seed::Env(Candidate { source, root }) => {
                self.attempt(&template, root.clone(), source.clone())
                    .map_err(|err| DetectError::SeedFailed {
                        key: source.to_string(),
                        root,
                        source: Box::new(err),
                    })
            }
            Seed::Fallbacks(candidates) if candidates.is_empty() => Err(DetectError::NoCandidates),
            Seed::Fallbacks(candidates) => {
                let mut failures = Vec::with_capacity(candidates.len());
                for Candidate { source, root } in candidates {
                    match self.attempt(&template, root.clone(), source.clone()) {
                        Ok(resolution) => return Ok(resolution),
                        Err(error) => {
                            tracing::debug!(%source, root = %root.display(), %error, "base directory rejected");
                            failures.push(FailedAttempt {
                                source,
                                root,
                                error,
                            });
                        }
                    }
                }
                Err(DetectError::NoBaseDir(failures))
            }
        }
    }

    /// Detect paths against an explicit base directory.
    pub fn detect_from(&self, root: impl Into<PathBuf>, decl: &DirDecl) -> DetectResult<Resolution> {
        let template = self.schema(decl)?;
        self.attempt(&template, root.into(), SeedSource::Explicit)
    }

    /// Detect paths for a typed layout and write them into it.
    ///
    /// `target` is only touched when detection succeeds.
    pub fn detect_into<L: Layout>(&self, target: &mut L) -> DetectResult<Resolution> {
        let resolution = self.detect(&L::declare())?;
        target.apply(&resolution);
        Ok(resolution)
    }

    fn attempt(&self, template: &Schema, root: PathBuf, source: SeedSource) -> DetectResult<Resolution> {
        let mut schema = template.clone();
        schema.set_path(NodeId::ROOT, root);

        let mut resolver = Resolver::new(self.fs.as_ref(), self.env.as_ref());
        if let Some(sink) = &self.trace {
            resolver = resolver.with_trace(sink.as_ref());
        }
        let pruned = resolver.resolve(&mut schema)?;
        Ok(Resolution::collect(&schema, source, pruned))
    }
}
