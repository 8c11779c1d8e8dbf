//! Configuration module

mod collection;

pub use collection::CollectionConfig;
pub use collection::ConfigError;
pub use collection::DatePolicy;
pub use collection::CONFIG_FILES;
