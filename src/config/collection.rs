//! Collection configuration (collection.yml / collection.toml)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file names looked for in the site directory, in order
pub const CONFIG_FILES: [&str; 3] = ["collection.yml", "collection.yaml", "collection.toml"];

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid YAML in {path:?}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Invalid TOML in {path:?}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid glob pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

/// When a post must carry a `date`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatePolicy {
    /// Only published (non-draft) posts need a date
    #[default]
    Conditional,
    /// Every post needs a date, drafts included
    Required,
}

/// Blog collection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Collection name
    pub name: String,
    /// Directory holding the documents, relative to the site directory
    pub base: String,
    /// Glob matched against base-relative paths
    pub pattern: String,
    pub date_policy: DatePolicy,
    /// Extension used by `new` when scaffolding a post
    pub new_post_extension: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            name: "blog".to_string(),
            base: "src/content/blog".to_string(),
            pattern: "**/*.mdx".to_string(),
            date_policy: DatePolicy::Conditional,
            new_post_extension: "mdx".to_string(),
        }
    }
}

impl CollectionConfig {
    /// Load configuration from a file, picking the format from its extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: CollectionConfig = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })?,
            _ => {
                if content.trim().is_empty() {
                    CollectionConfig::default()
                } else {
                    serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                        path: path.to_path_buf(),
                        source,
                    })?
                }
            }
        };

        config.glob()?;
        tracing::debug!("Loaded collection config from {:?}", path);
        Ok(config)
    }

    /// Find the config file in a site directory, if any
    pub fn find<P: AsRef<Path>>(site_dir: P) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| site_dir.as_ref().join(name))
            .find(|p| p.is_file())
    }

    /// Compiled glob pattern
    pub fn glob(&self) -> Result<glob::Pattern, ConfigError> {
        glob::Pattern::new(&self.pattern).map_err(|e| ConfigError::Pattern {
            pattern: self.pattern.clone(),
            message: e.msg.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CollectionConfig::default();
        assert_eq!(config.name, "blog");
        assert_eq!(config.base, "src/content/blog");
        assert_eq!(config.pattern, "**/*.mdx");
        assert_eq!(config.date_policy, DatePolicy::Conditional);
    }

    #[test]
    fn test_parse_yaml_config() {
        let yaml = r#"
base: content/posts
pattern: "**/*.md"
date_policy: required
"#;
        let config: CollectionConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "blog");
        assert_eq!(config.base, "content/posts");
        assert_eq!(config.pattern, "**/*.md");
        assert_eq!(config.date_policy, DatePolicy::Required);
    }

    #[test]
    fn test_load_toml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.toml");
        fs::write(&path, "name = \"notes\"\npattern = \"*.md\"\n").unwrap();

        assert_eq!(CollectionConfig::find(dir.path()), Some(path.clone()));
        let config = CollectionConfig::load(&path).unwrap();
        assert_eq!(config.name, "notes");
        assert_eq!(config.pattern, "*.md");
        assert_eq!(config.new_post_extension, "mdx");
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.yml");
        fs::write(&path, "pattern: \"**/[.mdx\"\n").unwrap();

        let err = CollectionConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { .. }));
    }
}
