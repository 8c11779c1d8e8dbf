//! Front-matter extraction

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Front-matter that could not be read as a YAML mapping
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("Front-matter opened with '---' on line 1 is never closed")]
    Unterminated,

    #[error("Failed to parse YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Front-matter must be a mapping of keys to values, found {0}")]
    NotAMapping(&'static str),
}

/// Split a document into its front-matter mapping and body
///
/// Documents without an opening `---` line have no front-matter; the whole
/// text is returned as the body with an empty mapping.
pub fn split(document: &str) -> Result<(Mapping, &str), FrontMatterError> {
    let document = document.strip_prefix('\u{feff}').unwrap_or(document);

    let Some(rest) = strip_fence(document) else {
        return Ok((Mapping::new(), document));
    };

    // Find the closing fence: a line holding only `---`
    let mut offset = 0;
    let mut close: Option<(usize, usize)> = None;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == "---" {
            close = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }

    let (yaml_end, body_start) = close.ok_or(FrontMatterError::Unterminated)?;
    let yaml = &rest[..yaml_end];
    let body = &rest[body_start..];

    if yaml.trim().is_empty() {
        return Ok((Mapping::new(), body));
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => Ok((mapping, body)),
        Value::Null => Ok((Mapping::new(), body)),
        other => Err(FrontMatterError::NotAMapping(value_kind(&other))),
    }
}

/// Strip the opening `---` line, if the document starts with one
fn strip_fence(document: &str) -> Option<&str> {
    let rest = document.strip_prefix("---")?;
    if let Some(rest) = rest.strip_prefix("\r\n") {
        return Some(rest);
    }
    if let Some(rest) = rest.strip_prefix('\n') {
        return Some(rest);
    }
    // `---` followed by trailing blanks on the same line
    let line_end = rest.find('\n').unwrap_or(rest.len());
    if rest[..line_end].trim().is_empty() {
        Some(rest.get(line_end + 1..).unwrap_or(""))
    } else {
        None
    }
}

/// Name of a YAML value's type, as used in validation messages
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "array",
        Value::Mapping(_) => "object",
        Value::Tagged(tagged) => value_kind(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15
tags:
  - rust
  - astro
---

This is the content.
"#;

        let (fm, body) = split(content).unwrap();
        assert_eq!(
            fm.get("title").and_then(Value::as_str),
            Some("Hello World")
        );
        assert_eq!(fm.get("date").and_then(Value::as_str), Some("2024-01-15"));
        assert_eq!(body, "\nThis is the content.\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just a heading\n\nSome text.\n";
        let (fm, body) = split(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_crlf_and_bom() {
        let content = "\u{feff}---\r\ntitle: Windows\r\n---\r\nBody\r\n";
        let (fm, body) = split(content).unwrap();
        assert_eq!(fm.get("title").and_then(Value::as_str), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_empty_block() {
        let (fm, body) = split("---\n---\nBody").unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unterminated() {
        let err = split("---\ntitle: Oops\n\nNo closing fence\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Unterminated));
    }

    #[test]
    fn test_not_a_mapping() {
        let err = split("---\n- a\n- b\n---\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::NotAMapping("array")));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = split("---\ntitle: [unclosed\n---\n").unwrap_err();
        assert!(matches!(err, FrontMatterError::Yaml(_)));
    }

    #[test]
    fn test_horizontal_rule_is_not_a_fence() {
        let content = "---- not a fence\ntext\n";
        let (fm, body) = split(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }
}
