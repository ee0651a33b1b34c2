//! Test utilities: environment isolation and temporary directory layouts.
//!
//! Tests that read or write process environment variables must hold
//! [`ENV_LOCK`] so concurrent tests cannot observe each other's values.

use std::env;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tempfile::TempDir;

use crate::decl::{DirDecl, Field};

/// Shared lock to serialize tests that depend on environment variables.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// RAII guard that restores an environment variable to its original value on drop.
///
/// ```ignore
/// let _guard = ENV_LOCK.lock().unwrap();
/// let _env = EnvVarGuard::set("APP_DIR", "/tmp/test");
/// ```
pub struct EnvVarGuard {
    key: String,
    previous: Option<String>,
}

impl EnvVarGuard {
    /// Set an environment variable and return a guard that will restore it.
    #[allow(unsafe_code)]
    pub fn set(key: &str, value: &str) -> Self {
        let previous = env::var(key).ok();
        unsafe {
            env::set_var(key, value);
        }
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for EnvVarGuard {
    #[allow(unsafe_code)]
    fn drop(&mut self) {
        if let Some(ref value) = self.previous {
            unsafe {
                env::set_var(&self.key, value);
            }
        } else {
            unsafe {
                env::remove_var(&self.key);
            }
        }
    }
}

/// A temporary directory populated with files and directories.
pub struct TempLayout {
    dir: TempDir,
}

impl TempLayout {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Create a directory (and its parents) relative to the root.
    pub fn dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.root().join(rel)).expect("create dir");
        self
    }

    /// Create an empty file (and its parent directories) relative to the root.
    pub fn file(self, rel: &str) -> Self {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, b"").expect("write file");
        self
    }
}

/// A work-directory declaration exercising every tag option.
pub fn sample_work() -> DirDecl {
    DirDecl::new(vec![
        Field::string("Path"),
        Field::dir(
            "Conf",
            vec![
                Field::string("DitFile").with_tag("Ext(txt);Split(-);"),
                Field::string("DBConfigID").with_tag("Key(DB_CNF_ID);"),
                Field::string("LogID").with_tag("Ext(file);Priority(~/.pathscout-missing-priority)"),
            ],
        )
        .with_tag("Key(CONF_DIR);"),
        Field::dir(
            "Runtimes",
            vec![
                Field::string("Path"),
                Field::dir("Log", vec![Field::string("Path")]),
                Field::dir(
                    "Search",
                    vec![
                        Field::string("DIYPath"),
                        Field::dir(
                            "Document",
                            vec![
                                Field::string("Path"),
                                Field::string("OptFile").with_tag("Opt();"),
                            ],
                        ),
                        Field::dir("Post", vec![Field::string("Path")]),
                    ],
                )
                .with_tag("Path(DIYPath)"),
            ],
        ),
    ])
}
