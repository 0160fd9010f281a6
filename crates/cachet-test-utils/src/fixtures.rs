//! Fixture values for builder tests.

use cachet_core::{CacheConfiguration, CacheConfigurationBuilder, ServiceConfiguration};

/// A declarative service configuration carrying only a tag.
///
/// It targets no service, so it only shows up in the resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagConfiguration(pub String);

impl TagConfiguration {
    /// Creates a tag configuration.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}

impl ServiceConfiguration for TagConfiguration {}

/// A cache configuration bounded to `max_entries`.
pub fn cache_config<K, V>(max_entries: u64) -> CacheConfiguration<K, V> {
    CacheConfigurationBuilder::new()
        .max_entries(max_entries)
        .build::<K, V>()
}
