//! Name inference and environment-key sanitizing.
//!
//! Declarations are named with identifier-style strings (`DBConfigID`,
//! `helloWorld`, `Hu_hu`). This module turns them into path segments and
//! environment variable names:
//!
//! - [`split_name`] breaks an identifier into tokens on case boundaries,
//!   keeping acronym runs together and gluing underscore-joined lowercase
//!   words back onto the previous token
//! - [`infer_name`] joins those tokens with a separator, lowercases them and
//!   appends an optional extension
//! - [`to_env_key`] maps arbitrary text onto the legal environment variable
//!   character set

use regex::Regex;
use std::sync::LazyLock;

/// Any character outside the portable environment variable alphabet.
static ILLEGAL_ENV_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("valid regex"));

/// A leading run of digits.
static LEADING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+").expect("valid regex"));

/// Shape of an explicitly configured environment key.
static ENV_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[_a-zA-Z][A-Za-z0-9_]+$").expect("valid regex"));

const fn is_upper(ch: char) -> bool {
    ch.is_ascii_uppercase()
}

/// Split an identifier into name tokens.
///
/// Rules, applied per `_`-separated segment:
/// - a lowercase → uppercase transition starts a new token
/// - consecutive uppercase characters form an acronym; a following
///   non-uppercase character peels the last capital off into the next token
///   (`FooIDThird` → `Foo`, `ID`, `Third`)
/// - a token starting with a lowercase character that follows an underscore
///   is glued onto the previous token with the original underscore run
///   (`Hu_hu_yo__xi` stays one token)
///
/// Tokens keep their original casing.
///
/// ```
/// use pathscout_core::naming::split_name;
///
/// assert_eq!(split_name("DBConfigID"), vec!["DB", "Config", "ID"]);
/// assert_eq!(split_name("log_file"), vec!["log_file"]);
/// ```
pub fn split_name(ident: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    // Number of empty segments (extra underscores) since the last token.
    let mut pending_links = 0usize;

    for segment in ident.split('_') {
        let mut buf: Vec<char> = Vec::with_capacity(segment.len());

        for ch in segment.chars() {
            if is_upper(ch) {
                if buf.last().is_some_and(|last| !is_upper(*last)) {
                    push_token(&mut tokens, &buf, pending_links);
                    buf.clear();
                }
            } else if buf.len() >= 2 && buf[buf.len() - 2..].iter().all(|c| is_upper(*c)) {
                let tail = buf.split_off(buf.len() - 1);
                tokens.push(buf.iter().collect());
                buf = tail;
            }
            buf.push(ch);
        }

        if buf.is_empty() {
            pending_links += 1;
        } else {
            push_token(&mut tokens, &buf, pending_links);
            pending_links = 0;
        }
    }

    tokens
}

fn push_token(tokens: &mut Vec<String>, buf: &[char], pending_links: usize) {
    let word: String = buf.iter().collect();
    let starts_lower = buf.first().is_some_and(|c| !is_upper(*c));
    match tokens.last_mut() {
        Some(prev) if starts_lower => {
            prev.push_str(&"_".repeat(pending_links + 1));
            prev.push_str(&word);
        }
        _ => tokens.push(word),
    }
}

/// Infer a path segment from an identifier.
///
/// Returns `None` when the identifier yields no tokens; callers fall back to
/// the raw identifier. The extension is always dot-joined regardless of
/// `split`.
pub fn infer_name(ident: &str, split: &str, ext: Option<&str>) -> Option<String> {
    let tokens = split_name(ident);
    if tokens.is_empty() {
        return None;
    }
    let mut name = tokens.join(split).to_lowercase();
    if let Some(ext) = ext {
        name.push('.');
        name.push_str(ext);
    }
    Some(name)
}

/// Convert an identifier into a lower-camel variable name.
///
/// `"DBConfigID"` becomes `"dbConfigID"`.
pub fn split_name_to_var(ident: &str) -> String {
    let mut tokens = split_name(ident).into_iter();
    let Some(first) = tokens.next() else {
        return String::new();
    };
    let mut var = first.to_lowercase();
    var.extend(tokens);
    var
}

/// Sanitize text into a legal environment variable name.
///
/// Every character outside `[A-Za-z0-9_]` becomes `_`, then a leading run of
/// digits collapses into a single `_`.
pub fn to_env_key(raw: &str) -> String {
    let replaced = ILLEGAL_ENV_CHAR.replace_all(raw, "_");
    LEADING_DIGITS.replace(&replaced, "_").into_owned()
}

/// Whether `key` is acceptable as an explicitly configured environment key.
pub fn is_valid_env_key(key: &str) -> bool {
    ENV_KEY.is_match(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_mixed_identifier() {
        let expected = vec![
            "hello",
            "World",
            "Foo",
            "ID",
            "Third",
            "APP",
            "Bar",
            "You",
            "Hu_hu_yo__xi",
            "XI",
        ];
        assert_eq!(
            split_name("helloWorld_FooIDThirdAPP_Bar__You_Hu_hu_yo__xiXI"),
            expected
        );
    }

    #[test]
    fn test_split_single_word() {
        assert_eq!(split_name("user"), vec!["user"]);
    }

    #[test]
    fn test_split_acronym_then_word() {
        assert_eq!(split_name("DBConfigID"), vec!["DB", "Config", "ID"]);
        assert_eq!(split_name("LogID"), vec!["Log", "ID"]);
        assert_eq!(split_name("DIYPath"), vec!["DIY", "Path"]);
    }

    #[test]
    fn test_split_underscore_with_case_boundary_splits() {
        assert_eq!(split_name("Foo_Bar"), vec!["Foo", "Bar"]);
        assert_eq!(split_name("Hu_hu"), vec!["Hu_hu"]);
    }

    #[test]
    fn test_split_empty_and_underscores_only() {
        assert!(split_name("").is_empty());
        assert!(split_name("___").is_empty());
    }

    #[test]
    fn test_split_join_resplit_is_stable() {
        for ident in ["helloWorldFoo", "DitFile", "OptFile", "Search", "Hu_hu_yo"] {
            let first = split_name(ident);
            let second = split_name(&first.join("_"));
            assert_eq!(first, second, "unstable split for {ident}");
        }
    }

    #[test]
    fn test_infer_name_joins_and_lowercases() {
        assert_eq!(
            infer_name("DitFile", "-", Some("txt")).as_deref(),
            Some("dit-file.txt")
        );
        assert_eq!(
            infer_name("DBConfigID", ".", None).as_deref(),
            Some("db.config.id")
        );
        assert_eq!(infer_name("", ".", None), None);
    }

    #[test]
    fn test_extension_keeps_case() {
        assert_eq!(
            infer_name("Readme", "_", Some("MD")).as_deref(),
            Some("readme.MD")
        );
    }

    #[test]
    fn test_split_name_to_var() {
        assert_eq!(split_name_to_var("DBConfigID"), "dbConfigID");
        assert_eq!(split_name_to_var("user"), "user");
        assert_eq!(split_name_to_var(""), "");
    }

    #[test]
    fn test_to_env_key() {
        assert_eq!(
            to_env_key("Hello-World_Foo你好Bar.txt"),
            "Hello_World_Foo__Bar_txt"
        );
    }

    #[test]
    fn test_to_env_key_leading_digits() {
        assert_eq!(to_env_key("123abc"), "_abc");
        assert_eq!(to_env_key("a123"), "a123");
    }

    #[test]
    fn test_valid_env_key() {
        assert!(is_valid_env_key("CONF_DIR"));
        assert!(is_valid_env_key("_x"));
        assert!(!is_valid_env_key("1ABC"));
        assert!(!is_valid_env_key("A-B"));
        assert!(!is_valid_env_key("A"));
    }
}
