//! Content loader - loads blog entries from the collection directory

use glob::{MatchOptions, Pattern};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use super::frontmatter::{self, value_kind, FrontMatterError};
use super::issue::{Issue, IssuePath, ValidationError};
use super::schema::{self, ValidationContext};
use super::{Collection, Entry};
use crate::config::ConfigError;
use crate::helpers::{entry_id, to_slash_path};
use crate::Site;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Why a single document was rejected
#[derive(Error, Debug)]
pub enum EntryError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Duplicate id '{id}' (already used by {first:?})")]
    DuplicateId { id: String, first: PathBuf },
}

/// A document that failed to load, with the reason
#[derive(Debug)]
pub struct EntryFailure {
    pub path: PathBuf,
    pub error: EntryError,
}

impl fmt::Display for EntryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

/// Collection-level errors
#[derive(Error, Debug)]
pub enum CollectionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Collection '{name}' has {} invalid entries", .failures.len())]
    Invalid {
        name: String,
        failures: Vec<EntryFailure>,
    },
}

/// Outcome of loading a collection: what validated and what did not
#[derive(Debug)]
pub struct LoadReport {
    pub name: String,
    pub entries: Vec<Entry>,
    pub failures: Vec<EntryFailure>,
}

impl LoadReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// The collection, if every document validated
    pub fn into_collection(self) -> Result<Collection, CollectionError> {
        if self.failures.is_empty() {
            Ok(Collection::new(self.name, self.entries))
        } else {
            Err(CollectionError::Invalid {
                name: self.name,
                failures: self.failures,
            })
        }
    }
}

/// Loads entries from the collection directory
pub struct CollectionLoader<'a> {
    site: &'a Site,
    pattern: Pattern,
}

impl<'a> CollectionLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Result<Self, ConfigError> {
        let pattern = site.config.glob()?;
        Ok(Self { site, pattern })
    }

    /// Walk the collection directory and validate every matching document
    pub fn load(&self) -> LoadReport {
        let base = &self.site.collection_dir;
        let mut report = LoadReport {
            name: self.site.config.name.clone(),
            entries: Vec::new(),
            failures: Vec::new(),
        };

        if !base.is_dir() {
            tracing::warn!("Collection directory {:?} does not exist", base);
            return report;
        }

        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for entry in WalkDir::new(base)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_ignored(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable path: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !self.matches(path) {
                continue;
            }

            match self.load_entry(path) {
                Ok(loaded) => {
                    if let Some(first) = seen.get(&loaded.id) {
                        tracing::warn!("Duplicate id '{}' at {:?}", loaded.id, path);
                        report.failures.push(EntryFailure {
                            path: path.to_path_buf(),
                            error: EntryError::DuplicateId {
                                id: loaded.id,
                                first: first.clone(),
                            },
                        });
                        continue;
                    }
                    tracing::debug!("Loaded entry '{}' from {:?}", loaded.id, path);
                    seen.insert(loaded.id.clone(), path.to_path_buf());
                    report.entries.push(loaded);
                }
                Err(error) => {
                    tracing::debug!("Rejected {:?}: {}", path, error);
                    report.failures.push(EntryFailure {
                        path: path.to_path_buf(),
                        error,
                    });
                }
            }
        }

        report.entries.sort_by(|a, b| a.id.cmp(&b.id));

        tracing::info!(
            "Loaded {} entries into '{}' ({} invalid)",
            report.entries.len(),
            report.name,
            report.failures.len()
        );

        report
    }

    /// Load a single entry from a file
    pub fn load_entry(&self, path: &Path) -> Result<Entry, EntryError> {
        let content = fs::read_to_string(path)?;
        let (mapping, body) = frontmatter::split(&content)?;

        let document_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let ctx =
            ValidationContext::new(self.site.config.date_policy).with_document_dir(document_dir);
        let (data, slug) = match (schema::validate(&mapping, &ctx), slug_override(&mapping)) {
            (Ok(data), Ok(slug)) => (data, slug),
            (validated, slug) => {
                let mut issues = validated.err().map(|err| err.issues).unwrap_or_default();
                issues.extend(slug.err());
                return Err(ValidationError { issues }.into());
            }
        };

        let id = slug.unwrap_or_else(|| entry_id(self.relative(path)));

        Ok(Entry {
            id,
            path: path.to_path_buf(),
            data,
            body: body.to_string(),
        })
    }

    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(&self.site.collection_dir).unwrap_or(path)
    }

    fn matches(&self, path: &Path) -> bool {
        let relative = to_slash_path(self.relative(path));
        self.pattern.matches_with(&relative, MATCH_OPTIONS)
    }
}

/// The id a document asks for through its `slug` key, if any
fn slug_override(mapping: &Mapping) -> Result<Option<String>, Issue> {
    match mapping.get("slug") {
        None => Ok(None),
        Some(Value::String(slug)) => {
            let slug = slug.trim().trim_matches('/');
            Ok((!slug.is_empty()).then(|| slug.to_string()))
        }
        Some(other) => Err(Issue::new(
            IssuePath::root().key("slug"),
            format!("Expected string, received {}", value_kind(other)),
        )),
    }
}

/// Files and directories starting with `_` or `.` are not content
fn is_ignored(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('_') || name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectionConfig;
    use tempfile::TempDir;

    fn site_with(files: &[(&str, &str)]) -> (TempDir, Site) {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::with_config(dir.path(), CollectionConfig::default());
        for (name, content) in files {
            let path = site.collection_dir.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        (dir, site)
    }

    const VALID: &str = "---\ntitle: Hello\ndescription: First post\ndate: 2024-01-15\n---\n\nBody text.\n";
    const DRAFT: &str = "---\ntitle: Later\ndescription: Not yet\ndraft: true\n---\nWIP\n";

    #[test]
    fn test_load_valid_collection() {
        let (_dir, site) = site_with(&[
            ("hello-world.mdx", VALID),
            ("2024/Second Post.mdx", VALID),
            ("drafts/later.mdx", DRAFT),
        ]);
        let loader = CollectionLoader::new(&site).unwrap();
        let report = loader.load();
        assert!(report.is_ok(), "{:?}", report.failures);

        let collection = report.into_collection().unwrap();
        let ids: Vec<_> = collection.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2024/second-post", "drafts/later", "hello-world"]);

        let hello = collection.get("hello-world").unwrap();
        assert_eq!(hello.data.title, "Hello");
        assert_eq!(hello.body, "\nBody text.\n");
        assert_eq!(collection.published().len(), 2);
        assert_eq!(collection.drafts().len(), 1);
    }

    #[test]
    fn test_pattern_and_ignored_paths() {
        let (_dir, site) = site_with(&[
            ("post.mdx", VALID),
            ("notes.md", VALID),
            ("_partial.mdx", "not front-matter at all"),
            ("_shared/component.mdx", "nope"),
            (".hidden/post.mdx", "nope"),
        ]);
        let report = CollectionLoader::new(&site).unwrap().load();
        assert!(report.is_ok(), "{:?}", report.failures);
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].id, "post");
    }

    #[test]
    fn test_failures_are_collected() {
        let (_dir, site) = site_with(&[
            ("good.mdx", VALID),
            ("undated.mdx", "---\ntitle: T\ndescription: D\n---\n"),
            ("broken.mdx", "---\ntitle: T\n"),
        ]);
        let report = CollectionLoader::new(&site).unwrap().load();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.failures.len(), 2);

        let broken = report
            .failures
            .iter()
            .find(|f| f.path.ends_with("broken.mdx"))
            .unwrap();
        assert!(matches!(
            broken.error,
            EntryError::FrontMatter(FrontMatterError::Unterminated)
        ));

        let undated = report
            .failures
            .iter()
            .find(|f| f.path.ends_with("undated.mdx"))
            .unwrap();
        match &undated.error {
            EntryError::Validation(err) => assert!(err.has_issue_at("date")),
            other => panic!("unexpected error: {}", other),
        }

        let err = report.into_collection().unwrap_err();
        assert_eq!(err.to_string(), "Collection 'blog' has 2 invalid entries");
    }

    #[test]
    fn test_slug_override_and_duplicates() {
        let custom = "---\ntitle: T\ndescription: D\ndate: 2024-01-01\nslug: hello-world\n---\n";
        let (_dir, site) = site_with(&[("a-custom.mdx", custom), ("hello-world.mdx", VALID)]);
        let report = CollectionLoader::new(&site).unwrap().load();

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].id, "hello-world");
        assert!(report.entries[0].path.ends_with("a-custom.mdx"));
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(
            &report.failures[0].error,
            EntryError::DuplicateId { id, .. } if id == "hello-world"
        ));
    }

    #[test]
    fn test_non_string_slug_rejected() {
        let numeric = "---\ntitle: T\ndescription: D\ndate: 2024-01-01\nslug: 42\n---\n";
        let broken = "---\ntitle: 7\ndescription: D\ndate: 2024-01-01\nslug: [a]\n---\n";
        let (_dir, site) = site_with(&[("numeric.mdx", numeric), ("broken.mdx", broken)]);
        let report = CollectionLoader::new(&site).unwrap().load();

        assert!(report.entries.is_empty());
        assert_eq!(report.failures.len(), 2);
        for failure in &report.failures {
            let EntryError::Validation(err) = &failure.error else {
                panic!("expected a validation failure, got {:?}", failure.error);
            };
            assert!(err.has_issue_at("slug"));
        }
        let message = report
            .failures
            .iter()
            .find(|f| f.path.ends_with("numeric.mdx"))
            .map(|f| f.error.to_string())
            .unwrap();
        assert!(message.contains("slug: Expected string, received number"));
        let message = report
            .failures
            .iter()
            .find(|f| f.path.ends_with("broken.mdx"))
            .map(|f| f.error.to_string())
            .unwrap();
        assert!(message.contains("title: Expected string, received number"));
        assert!(message.contains("slug: Expected string, received array"));
    }

    #[test]
    fn test_index_file_takes_directory_id() {
        let (_dir, site) = site_with(&[("guides/index.mdx", VALID)]);
        let report = CollectionLoader::new(&site).unwrap().load();
        assert_eq!(report.entries[0].id, "guides");
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::with_config(dir.path(), CollectionConfig::default());
        let report = CollectionLoader::new(&site).unwrap().load();
        assert!(report.is_ok());
        assert!(report.into_collection().unwrap().is_empty());
    }
}
