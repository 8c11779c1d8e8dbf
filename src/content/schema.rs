//! Blog post front-matter schema
//!
//! Front-matter arrives as an untyped YAML mapping. [`validate`] walks it
//! field by field, coercing dates and applying defaults, and collects every
//! problem it finds instead of stopping at the first one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use url::Url;

use super::frontmatter::value_kind;
use super::issue::{Issue, IssuePath, ValidationError};
use crate::config::DatePolicy;
use crate::helpers::{from_epoch_millis, parse_date_string, parse_url};

/// Message reported when a published post has no date
pub const MISSING_DATE_MESSAGE: &str =
    "Published posts must have a date. Add 'date' or set 'draft: true'.";

/// Keys read by the loader rather than the schema
const LOADER_KEYS: [&str; 1] = ["slug"];

const SCHEMA_KEYS: [&str; 10] = [
    "title",
    "description",
    "date",
    "updatedDate",
    "tags",
    "draft",
    "image",
    "heroImage",
    "ogImage",
    "sources",
];

/// Validated blog post front-matter
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub title: String,
    pub description: String,

    /// Publication date; may only be absent on drafts
    pub date: Option<DateTime<Utc>>,

    pub updated_date: Option<DateTime<Utc>>,

    pub tags: Vec<String>,

    /// Drafts stay in the source tree but are never published
    pub draft: bool,

    /// Plain image path, used as-is
    pub image: Option<String>,

    /// Image resolved next to the document
    pub hero_image: Option<ImageRef>,

    /// Public path for social sharing cards
    pub og_image: Option<String>,

    pub sources: Option<Vec<Source>>,
}

impl BlogPost {
    /// Whether the post should appear on the site
    pub fn is_published(&self) -> bool {
        !self.draft
    }
}

/// A cited source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub title: String,
    pub url: Url,
}

/// Reference to a local image that the site pipeline can optimize
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    /// Path as written in the front-matter
    pub src: String,
    /// Resolved location on disk
    pub path: PathBuf,
    pub format: ImageFormat,
}

/// Image formats accepted for `heroImage`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
    Gif,
    Avif,
    Svg,
    Tiff,
}

impl ImageFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            "gif" => Some(Self::Gif),
            "avif" => Some(Self::Avif),
            "svg" => Some(Self::Svg),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }
}

/// Settings that affect validation of a single document
#[derive(Debug, Clone)]
pub struct ValidationContext {
    pub date_policy: DatePolicy,
    /// Directory relative image paths are resolved against
    pub document_dir: PathBuf,
}

impl ValidationContext {
    pub fn new(date_policy: DatePolicy) -> Self {
        Self {
            date_policy,
            document_dir: PathBuf::from("."),
        }
    }

    pub fn with_document_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.document_dir = dir.as_ref().to_path_buf();
        self
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new(DatePolicy::default())
    }
}

/// Validate a front-matter mapping against the blog post schema
pub fn validate(
    mapping: &Mapping,
    ctx: &ValidationContext,
) -> Result<BlogPost, ValidationError> {
    let mut v = Validator {
        ctx,
        issues: Vec::new(),
    };
    let root = IssuePath::root();

    for key in mapping.keys() {
        let known = key
            .as_str()
            .map(|k| SCHEMA_KEYS.contains(&k) || LOADER_KEYS.contains(&k))
            .unwrap_or(false);
        if !known {
            tracing::debug!("Stripping unknown front-matter key {:?}", key);
        }
    }

    let title = v.required_string(field(mapping, "title"), root.key("title"));
    let description = v.required_string(field(mapping, "description"), root.key("description"));

    let date_field = field(mapping, "date");
    let date = v.optional_date(date_field, root.key("date"));
    let updated_date = v.optional_date(field(mapping, "updatedDate"), root.key("updatedDate"));

    let tags = v.string_list(field(mapping, "tags"), root.key("tags"));

    let draft = v.boolean(field(mapping, "draft"), root.key("draft"), false);

    let image = v.optional_string(field(mapping, "image"), root.key("image"));
    let hero_image = v.image_ref(field(mapping, "heroImage"), root.key("heroImage"));
    let og_image = v.optional_string(field(mapping, "ogImage"), root.key("ogImage"));
    let sources = v.sources(field(mapping, "sources"), root.key("sources"));

    // The publish rule is checked against a record whose fields are all
    // valid; a missing date under the strict policy is a field issue
    if date_field.is_none() {
        match ctx.date_policy {
            DatePolicy::Required => v.push(root.key("date"), "Required"),
            DatePolicy::Conditional if v.issues.is_empty() && !draft => {
                v.push(root.key("date"), MISSING_DATE_MESSAGE)
            }
            DatePolicy::Conditional => {}
        }
    }

    if !v.issues.is_empty() {
        return Err(ValidationError { issues: v.issues });
    }

    Ok(BlogPost {
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        date,
        updated_date,
        tags,
        draft,
        image,
        hero_image,
        og_image,
        sources,
    })
}

/// Look up a key; an explicit `null` is a value, not an omission
fn field<'a>(mapping: &'a Mapping, key: &str) -> Option<&'a Value> {
    mapping.get(key)
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

struct Validator<'a> {
    ctx: &'a ValidationContext,
    issues: Vec<Issue>,
}

impl Validator<'_> {
    fn push(&mut self, path: IssuePath, message: impl Into<String>) {
        self.issues.push(Issue::new(path, message));
    }

    fn expected(&mut self, path: IssuePath, expected: &str, found: &Value) {
        let message = format!("Expected {}, received {}", expected, value_kind(found));
        self.push(path, message);
    }

    fn string(&mut self, value: &Value, path: IssuePath) -> Option<String> {
        match untag(value) {
            Value::String(s) => Some(s.clone()),
            other => {
                self.expected(path, "string", other);
                None
            }
        }
    }

    fn required_string(&mut self, value: Option<&Value>, path: IssuePath) -> Option<String> {
        match value {
            Some(value) => self.string(value, path),
            None => {
                self.push(path, "Required");
                None
            }
        }
    }

    fn optional_string(&mut self, value: Option<&Value>, path: IssuePath) -> Option<String> {
        value.and_then(|value| self.string(value, path))
    }

    fn boolean(&mut self, value: Option<&Value>, path: IssuePath, default: bool) -> bool {
        match value.map(untag) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                self.expected(path, "boolean", other);
                default
            }
        }
    }

    fn optional_date(&mut self, value: Option<&Value>, path: IssuePath) -> Option<DateTime<Utc>> {
        let value = untag(value?);
        let coerced = match value {
            Value::String(s) => parse_date_string(s),
            Value::Number(n) => n.as_f64().and_then(from_epoch_millis),
            _ => None,
        };
        if coerced.is_none() {
            self.push(path, "Invalid date");
        }
        coerced
    }

    fn string_list(&mut self, value: Option<&Value>, path: IssuePath) -> Vec<String> {
        let Some(value) = value else {
            return Vec::new();
        };
        match untag(value) {
            Value::Sequence(items) => items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| self.string(item, path.index(i)))
                .collect(),
            other => {
                self.expected(path, "array", other);
                Vec::new()
            }
        }
    }

    fn image_ref(&mut self, value: Option<&Value>, path: IssuePath) -> Option<ImageRef> {
        let src = self.optional_string(value, path.clone())?;
        let trimmed = src.trim();

        if trimmed.is_empty()
            || trimmed.starts_with('/')
            || trimmed.contains("://")
            || Path::new(trimmed).is_absolute()
        {
            self.push(path, "Image must be a relative path");
            return None;
        }

        let resolved = self.ctx.document_dir.join(trimmed);
        let ext = resolved
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_string();
        let Some(format) = ImageFormat::from_extension(&ext) else {
            let shown = if ext.is_empty() { "(none)" } else { ext.as_str() };
            self.push(path, format!("Unsupported image format: {}", shown));
            return None;
        };

        if !resolved.is_file() {
            self.push(path, format!("Image not found: {}", trimmed));
            return None;
        }

        Some(ImageRef {
            src,
            path: resolved,
            format,
        })
    }

    fn sources(&mut self, value: Option<&Value>, path: IssuePath) -> Option<Vec<Source>> {
        let items = match untag(value?) {
            Value::Sequence(items) => items,
            other => {
                self.expected(path, "array", other);
                return None;
            }
        };

        let mut sources = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let item_path = path.index(i);
            let entry = match untag(item) {
                Value::Mapping(entry) => entry,
                other => {
                    self.expected(item_path, "object", other);
                    continue;
                }
            };

            let title = self.required_string(field(entry, "title"), item_path.key("title"));
            let url_path = item_path.key("url");
            let url = self
                .required_string(field(entry, "url"), url_path.clone())
                .and_then(|raw| {
                    let parsed = parse_url(&raw);
                    if parsed.is_none() {
                        self.push(url_path, "Invalid url");
                    }
                    parsed
                });

            if let (Some(title), Some(url)) = (title, url) {
                sources.push(Source { title, url });
            }
        }

        Some(sources)
    }
}
