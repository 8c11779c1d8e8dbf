//! blog-collection: load and validate a static site's blog content collection
//!
//! Documents matching a glob under the collection directory are split into
//! YAML front-matter and body, validated against the blog post schema and
//! exposed as typed [`content::Entry`] records.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{Collection, CollectionError, CollectionLoader, LoadReport};

/// A site holding one blog collection
#[derive(Clone, Debug)]
pub struct Site {
    /// Collection configuration
    pub config: config::CollectionConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory the collection documents live in
    pub collection_dir: PathBuf,
    /// Config file the settings came from, if any
    pub config_path: Option<PathBuf>,
}

impl Site {
    /// Create a site from a directory, reading `collection.yml` or
    /// `collection.toml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        match config::CollectionConfig::find(base_dir) {
            Some(path) => Self::from_config_file(base_dir, path),
            None => Ok(Self::with_config(
                base_dir,
                config::CollectionConfig::default(),
            )),
        }
    }

    /// Create a site using an explicit config file
    pub fn from_config_file<P: AsRef<Path>, C: AsRef<Path>>(
        base_dir: P,
        config_path: C,
    ) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = if config_path.as_ref().is_absolute() {
            config_path.as_ref().to_path_buf()
        } else {
            base_dir.join(config_path)
        };
        let config = config::CollectionConfig::load(&config_path)?;
        let mut site = Self::with_config(base_dir, config);
        site.config_path = Some(config_path);
        Ok(site)
    }

    /// Create a site from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::CollectionConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let collection_dir = base_dir.join(&config.base);
        Self {
            config,
            base_dir,
            collection_dir,
            config_path: None,
        }
    }

    /// Load every document, keeping failures alongside valid entries
    pub fn load(&self) -> Result<LoadReport, CollectionError> {
        let loader = CollectionLoader::new(self)?;
        Ok(loader.load())
    }

    /// Load the collection, failing if any document is invalid
    pub fn collection(&self) -> Result<Collection, CollectionError> {
        self.load()?.into_collection()
    }
}
