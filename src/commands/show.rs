//! Print a single validated entry as JSON

use anyhow::{Context, Result};
use serde_json::json;

use crate::content::EntryError;
use crate::Site;

/// Render the entry with the given id as pretty JSON
pub fn render(site: &Site, id: &str, with_body: bool) -> Result<String> {
    let report = site.load()?;

    if let Some(entry) = report.entries.iter().find(|e| e.id == id) {
        let mut value = serde_json::to_value(entry)?;
        if with_body {
            value["body"] = json!(entry.body);
        }
        return serde_json::to_string_pretty(&value).context("Failed to serialize entry");
    }

    // Point at the file when the id belongs to a document that failed
    let expected = crate::helpers::entry_id(std::path::Path::new(id));
    if let Some(failure) = report.failures.iter().find(|f| {
        let relative = f
            .path
            .strip_prefix(&site.collection_dir)
            .unwrap_or(&f.path);
        crate::helpers::entry_id(relative) == expected
            || matches!(&f.error, EntryError::DuplicateId { id: dup, .. } if dup == id)
    }) {
        anyhow::bail!("Entry '{}' is invalid: {}", id, failure);
    }

    anyhow::bail!("No entry with id '{}' in '{}'", id, report.name)
}

/// Run the show command
pub fn run(site: &Site, id: &str, with_body: bool) -> Result<()> {
    println!("{}", render(site, id, with_body)?);
    Ok(())
}
