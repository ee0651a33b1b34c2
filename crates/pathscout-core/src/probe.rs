//! Filesystem and environment ports.
//!
//! Resolution only ever asks two questions of the outside world: does this
//! path exist (as a file / as a directory), and what is this environment
//! variable set to. Both are traits so tests can drive the resolver without
//! touching the real filesystem or process environment.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

/// Read-only existence checks.
#[cfg_attr(test, automock)]
pub trait Filesystem: Send + Sync {
    /// Whether `path` exists and is not a directory.
    fn is_file(&self, path: &Path) -> bool;

    /// Whether `path` exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFilesystem;

impl Filesystem for RealFilesystem {
    fn is_file(&self, path: &Path) -> bool {
        path.exists() && !path.is_dir()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Source of environment variable values.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Expand a leading `~` to the user's home directory.
///
/// Paths without `~`, and all paths when the home directory is unknown, are
/// returned unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) if rest.as_os_str().is_empty() => home,
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ENV_LOCK, EnvVarGuard};

    #[test]
    fn test_real_filesystem_distinguishes_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("app.toml");
        std::fs::write(&file, b"").unwrap();

        let fs = RealFilesystem;
        assert!(fs.is_dir(dir.path()));
        assert!(!fs.is_file(dir.path()));
        assert!(fs.is_file(&file));
        assert!(!fs.is_dir(&file));
        assert!(!fs.is_file(&dir.path().join("missing")));
    }

    #[test]
    fn test_process_env_reads_variable() {
        let _guard = ENV_LOCK.lock().unwrap();
        let _env = EnvVarGuard::set("PATHSCOUT_PROBE_TEST", "/tmp/x");
        assert_eq!(
            ProcessEnv.var("PATHSCOUT_PROBE_TEST").as_deref(),
            Some("/tmp/x")
        );
    }

    #[test]
    fn test_map_env_source() {
        let env = HashMap::from([("A".to_string(), "1".to_string())]);
        assert_eq!(env.var("A").as_deref(), Some("1"));
        assert_eq!(env.var("B"), None);
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home(Path::new("/etc/app")), PathBuf::from("/etc/app"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~")), home);
            assert_eq!(expand_home(Path::new("~/conf")), home.join("conf"));
        }
    }
}
