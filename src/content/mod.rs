//! Content module - front-matter parsing, schema validation and loading

mod collection;
pub mod frontmatter;
mod issue;
pub mod loader;
pub mod schema;

pub use collection::{Collection, Entry};
pub use frontmatter::FrontMatterError;
pub use issue::{Issue, IssuePath, PathSegment, ValidationError};
pub use loader::{CollectionError, CollectionLoader, EntryError, EntryFailure, LoadReport};
pub use schema::{BlogPost, ImageFormat, ImageRef, Source, ValidationContext};
