//! URL and id helper functions

use std::path::{Component, Path};
use url::Url;

/// Parse an absolute, well-formed URL
///
/// # Examples
/// ```ignore
/// parse_url("https://example.com/a") // -> Some(..)
/// parse_url("example.com")           // -> None
/// ```
pub fn parse_url(s: &str) -> Option<Url> {
    Url::parse(s.trim()).ok()
}

/// Generate an entry id from a path relative to the collection base
///
/// The extension is dropped, each segment slugified and a trailing
/// `index` segment removed.
///
/// # Examples
/// ```ignore
/// entry_id("2024/Hello World.mdx") // -> "2024/hello-world"
/// entry_id("guides/index.mdx")     // -> "guides"
/// ```
pub fn entry_id(relative: &Path) -> String {
    let without_ext = relative.with_extension("");
    let mut segments: Vec<String> = without_ext
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(slug::slugify(s.to_string_lossy())),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() > 1 && segments.last().map(String::as_str) == Some("index") {
        segments.pop();
    }

    segments.join("/")
}

/// Render a base-relative path with forward slashes for glob matching
pub fn to_slash_path(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_url() {
        assert!(parse_url("https://example.com/post?id=1").is_some());
        assert!(parse_url("mailto:someone@example.com").is_some());
        assert!(parse_url("example.com/no-scheme").is_none());
        assert!(parse_url("not a url").is_none());
        assert!(parse_url("").is_none());
    }

    #[test]
    fn test_entry_id() {
        assert_eq!(entry_id(Path::new("hello.mdx")), "hello");
        assert_eq!(
            entry_id(Path::new("2024/Hello World.mdx")),
            "2024/hello-world"
        );
        assert_eq!(entry_id(Path::new("guides/index.mdx")), "guides");
        assert_eq!(entry_id(Path::new("index.mdx")), "index");
    }

    #[test]
    fn test_to_slash_path() {
        let p: PathBuf = ["a", "b", "c.mdx"].iter().collect();
        assert_eq!(to_slash_path(&p), "a/b/c.mdx");
    }
}
