//! Validated collection of blog entries

use indexmap::IndexMap;
use serde::Serialize;
use std::path::PathBuf;

use super::schema::BlogPost;

/// A document that passed validation
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    /// Stable id derived from the document path (or its `slug`)
    pub id: String,

    /// Source file path
    pub path: PathBuf,

    pub data: BlogPost,

    /// Document body after the front-matter, unrendered
    #[serde(skip)]
    pub body: String,
}

/// A named set of validated entries
#[derive(Debug, Clone, Default)]
pub struct Collection {
    name: String,
    entries: Vec<Entry>,
}

impl Collection {
    /// Create a collection, ordering entries by id
    pub fn new(name: impl Into<String>, mut entries: Vec<Entry>) -> Self {
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            name: name.into(),
            entries,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All entries, drafts included, ordered by id
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by id
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries
            .binary_search_by(|e| e.id.as_str().cmp(id))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Published entries, newest first
    pub fn published(&self) -> Vec<&Entry> {
        let mut posts: Vec<&Entry> = self.entries.iter().filter(|e| !e.data.draft).collect();
        // Entries are id-ordered already, so a stable sort keeps ties by id
        posts.sort_by(|a, b| b.data.date.cmp(&a.data.date));
        posts
    }

    /// Draft entries, ordered by id
    pub fn drafts(&self) -> Vec<&Entry> {
        self.entries.iter().filter(|e| e.data.draft).collect()
    }

    /// Tag usage across published entries, most used first
    pub fn tags(&self) -> IndexMap<String, usize> {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for entry in self.entries.iter().filter(|e| !e.data.draft) {
            for tag in &entry.data.tags {
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }
        counts.sort_by(|ka, va, kb, vb| vb.cmp(va).then_with(|| ka.cmp(kb)));
        counts
    }

    /// Published entries carrying a tag, newest first
    pub fn with_tag(&self, tag: &str) -> Vec<&Entry> {
        self.published()
            .into_iter()
            .filter(|e| e.data.tags.iter().any(|t| t == tag))
            .collect()
    }
}
