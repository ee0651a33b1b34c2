//! Per-field tag options.
//!
//! Tags use a small `Key(value);Key(value)` syntax, e.g.
//! `Ext(txt);Split(-);Priority(/etc/app|/run/app)`. Recognized keys are
//! `Name`, `Key`, `Split`, `Ext`, `Opt`, `Path` and `Priority`; anything else
//! is rejected when the tag is parsed, before any resolution happens.

use std::path::PathBuf;
use std::str::FromStr;

use regex::Regex;
use std::sync::LazyLock;

use crate::error::DetectError;
use crate::naming::is_valid_env_key;

/// One `Key(value)` entry.
static TAG_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\((\S*)\)$").expect("valid regex"));

/// Default name of the field that receives a directory's own path.
pub const DEFAULT_PATH_FIELD: &str = "Path";

/// Value of `Key(-)`: never consult the environment for this node.
pub const NO_ENV_KEY: &str = "-";

/// How a node's environment variable key is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum KeyTag {
    /// Derive the key from the node's position in the tree.
    #[default]
    Derive,
    /// `Key(-)`: the node has no environment override.
    Disabled,
    /// An explicit, validated key.
    Explicit(String),
}

/// Options parsed from a field's tag string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Explicit file/directory name; wins over inference.
    pub name: Option<String>,
    /// Environment variable selection.
    pub key: KeyTag,
    /// Separator used when joining inferred name tokens.
    pub split: Option<String>,
    /// Extension appended with `.` after the inferred name.
    pub ext: Option<String>,
    /// The node may be missing without failing its parent.
    pub opt: bool,
    /// For directories: the string field that receives the directory path.
    pub path: String,
    /// Directories searched before the parent-relative fallback.
    pub priority: Vec<PathBuf>,
}

impl Default for Tag {
    fn default() -> Self {
        Self {
            name: None,
            key: KeyTag::Derive,
            split: None,
            ext: None,
            opt: false,
            path: DEFAULT_PATH_FIELD.to_string(),
            priority: Vec::new(),
        }
    }
}

impl Tag {
    /// Parse a tag string. An empty string yields the default tag.
    pub fn parse(raw: &str) -> Result<Self, DetectError> {
        let mut tag = Self::default();

        for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let caps = TAG_ENTRY
                .captures(entry)
                .ok_or_else(|| DetectError::MalformedTag(entry.to_string()))?;
            let value = &caps[2];

            match &caps[1] {
                "Name" => tag.name = non_empty(value),
                "Key" => tag.key = parse_key(value)?,
                "Split" => tag.split = non_empty(value),
                "Ext" => tag.ext = non_empty(value),
                "Opt" => tag.opt = true,
                "Path" => {
                    if !value.is_empty() {
                        tag.path = value.to_string();
                    }
                }
                "Priority" => {
                    tag.priority = value
                        .split('|')
                        .filter(|p| !p.is_empty())
                        .map(PathBuf::from)
                        .collect();
                }
                other => return Err(DetectError::UnknownTagOption(other.to_string())),
            }
        }

        Ok(tag)
    }
}

impl FromStr for Tag {
    type Err = DetectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_key(value: &str) -> Result<KeyTag, DetectError> {
    match value {
        "" => Ok(KeyTag::Derive),
        NO_ENV_KEY => Ok(KeyTag::Disabled),
        key if is_valid_env_key(key) => Ok(KeyTag::Explicit(key.to_string())),
        key => Err(DetectError::InvalidEnvKey(key.to_string())),
    }
}
