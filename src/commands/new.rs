//! Create a new post

use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::PathBuf;

use crate::config::DatePolicy;
use crate::Site;

/// Create a new post or draft in the collection directory
pub fn create_post(
    site: &Site,
    title: &str,
    draft: bool,
    path: Option<&str>,
) -> Result<PathBuf> {
    let now = chrono::Local::now();

    let stem = match path {
        Some(p) => p.trim_matches('/').to_string(),
        None => slug::slugify(title),
    };
    if stem.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let ext = site.config.new_post_extension.trim_start_matches('.');
    let file_path = site.collection_dir.join(format!("{}.{}", stem, ext));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let mut front = Mapping::new();
    front.insert("title".into(), title.into());
    front.insert("description".into(), "".into());
    // Drafts may go undated until they are published
    if !draft || site.config.date_policy == DatePolicy::Required {
        front.insert("date".into(), now.format("%Y-%m-%d").to_string().into());
    }
    front.insert("tags".into(), Value::Sequence(Vec::new()));
    if draft {
        front.insert("draft".into(), true.into());
    }

    let yaml = serde_yaml::to_string(&front).context("Failed to serialize front-matter")?;
    let content = format!("---\n{}---\n\n", yaml);

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;

    tracing::info!("Created {:?}", file_path);

    Ok(file_path)
}

/// Run the new command
pub fn run(site: &Site, title: &str, draft: bool, path: Option<&str>) -> Result<()> {
    let file_path = create_post(site, title, draft, path)?;
    println!("Created: {:?}", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollectionConfig;

    #[test]
    fn test_new_post_validates() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::with_config(dir.path(), CollectionConfig::default());

        let path = create_post(&site, "Hello: A \"Quoted\" World", false, None).unwrap();
        assert!(path.ends_with("hello-a-quoted-world.mdx"));

        let collection = site.collection().unwrap();
        let entry = collection.get("hello-a-quoted-world").unwrap();
        assert_eq!(entry.data.title, "Hello: A \"Quoted\" World");
        assert!(entry.data.date.is_some());
        assert!(!entry.data.draft);
    }

    #[test]
    fn test_new_draft_is_undated() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::with_config(dir.path(), CollectionConfig::default());

        create_post(&site, "Work in progress", true, Some("2024/wip")).unwrap();

        let collection = site.collection().unwrap();
        let entry = collection.get("2024/wip").unwrap();
        assert!(entry.data.draft);
        assert_eq!(entry.data.date, None);
    }

    #[test]
    fn test_new_draft_dated_under_required_policy() {
        let dir = tempfile::tempdir().unwrap();
        let config = CollectionConfig {
            date_policy: DatePolicy::Required,
            ..Default::default()
        };
        let site = Site::with_config(dir.path(), config);

        create_post(&site, "Strict", true, None).unwrap();
        let collection = site.collection().unwrap();
        assert!(collection.get("strict").unwrap().data.date.is_some());
    }

    #[test]
    fn test_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::with_config(dir.path(), CollectionConfig::default());

        create_post(&site, "Twice", false, None).unwrap();
        let err = create_post(&site, "Twice", false, None).unwrap_err();
        assert!(err.to_string().starts_with("File already exists"));
    }
}
