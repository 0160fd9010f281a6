//! Cache configuration values
//!
//! A [`CacheConfiguration`] is typed by the key and value types of the cache
//! it describes. Builders and resolved configurations carry it erased as
//! [`AnyCacheConfiguration`] and never interpret it.

use std::any::{type_name, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::domain::service::ServiceConfiguration;
use crate::util::AsAny;

/// Type-erased view over a [`CacheConfiguration`]
pub trait AnyCacheConfiguration: AsAny + fmt::Debug + Send + Sync {
    /// Fully qualified key type name
    fn key_type_name(&self) -> &'static str;

    /// Fully qualified value type name
    fn value_type_name(&self) -> &'static str;

    /// Key type id
    fn key_type_id(&self) -> TypeId;

    /// Value type id
    fn value_type_id(&self) -> TypeId;

    /// Entry capacity, if bounded
    fn max_entries(&self) -> Option<u64>;

    /// Per-cache service configurations
    fn service_configurations(&self) -> &[Arc<dyn ServiceConfiguration>];
}

/// Configuration of a single cache with keys `K` and values `V`
pub struct CacheConfiguration<K, V> {
    max_entries: Option<u64>,
    service_configurations: Vec<Arc<dyn ServiceConfiguration>>,
    _types: PhantomData<fn() -> (K, V)>,
}

impl<K, V> CacheConfiguration<K, V> {
    /// Entry capacity, if bounded
    pub fn max_entries(&self) -> Option<u64> {
        self.max_entries
    }

    /// Per-cache service configurations
    pub fn service_configurations(&self) -> &[Arc<dyn ServiceConfiguration>] {
        &self.service_configurations
    }
}

impl<K, V> Clone for CacheConfiguration<K, V> {
    fn clone(&self) -> Self {
        Self {
            max_entries: self.max_entries,
            service_configurations: self.service_configurations.clone(),
            _types: PhantomData,
        }
    }
}

impl<K, V> PartialEq for CacheConfiguration<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.max_entries == other.max_entries
            && self.service_configurations.len() == other.service_configurations.len()
            && self
                .service_configurations
                .iter()
                .zip(other.service_configurations.iter())
                .all(|(a, b)| **a == **b)
    }
}

impl<K, V> fmt::Debug for CacheConfiguration<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheConfiguration")
            .field("key_type", &type_name::<K>())
            .field("value_type", &type_name::<V>())
            .field("max_entries", &self.max_entries)
            .field("service_configurations", &self.service_configurations)
            .finish()
    }
}

impl<K: 'static, V: 'static> AnyCacheConfiguration for CacheConfiguration<K, V> {
    fn key_type_name(&self) -> &'static str {
        type_name::<K>()
    }

    fn value_type_name(&self) -> &'static str {
        type_name::<V>()
    }

    fn key_type_id(&self) -> TypeId {
        TypeId::of::<K>()
    }

    fn value_type_id(&self) -> TypeId {
        TypeId::of::<V>()
    }

    fn max_entries(&self) -> Option<u64> {
        self.max_entries
    }

    fn service_configurations(&self) -> &[Arc<dyn ServiceConfiguration>] {
        &self.service_configurations
    }
}

/// Builder for [`CacheConfiguration`] values
#[derive(Debug, Clone, Default)]
pub struct CacheConfigurationBuilder {
    max_entries: Option<u64>,
    service_configurations: Vec<Arc<dyn ServiceConfiguration>>,
}

impl CacheConfigurationBuilder {
    /// Creates an unbounded configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds the cache to `max_entries` entries.
    pub fn max_entries(mut self, max_entries: u64) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Attaches a per-cache service configuration.
    pub fn add_service_config<C: ServiceConfiguration + 'static>(mut self, config: C) -> Self {
        self.service_configurations.push(Arc::new(config));
        self
    }

    /// Freezes the builder into a configuration for keys `K` and values `V`.
    pub fn build<K, V>(&self) -> CacheConfiguration<K, V> {
        CacheConfiguration {
            max_entries: self.max_entries,
            service_configurations: self.service_configurations.clone(),
            _types: PhantomData,
        }
    }
}
