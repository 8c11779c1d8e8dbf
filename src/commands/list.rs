//! List collection content

use anyhow::Result;

use crate::content::Entry;
use crate::Site;

/// List collection content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let collection = site.collection()?;

    match content_type {
        "post" | "posts" => {
            let posts = collection.published();
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!("  {}", describe(post));
            }
        }
        "draft" | "drafts" => {
            let drafts = collection.drafts();
            println!("Drafts ({}):", drafts.len());
            for draft in drafts {
                println!("  {}", describe(draft));
            }
        }
        "tag" | "tags" => {
            let tags = collection.tags();
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, draft, tag",
                content_type
            );
        }
    }

    Ok(())
}

/// One-line summary of an entry
pub fn describe(entry: &Entry) -> String {
    let date = entry
        .data
        .date
        .as_ref()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    format!("{} - {} [{}]", date, entry.data.title, entry.id)
}
