//! Helper functions shared by the loader, schema and commands

mod date;
mod url;

pub use self::date::*;
pub use self::url::*;
