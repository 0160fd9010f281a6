//! Resolved configuration
//!
//! [`DefaultConfiguration`] is the immutable snapshot a manager is built from:
//! named cache configurations, an optional class loader and the service
//! configurations. It owns its collections, so the builder that produced it
//! can keep changing without affecting it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::domain::cache_configuration::{AnyCacheConfiguration, CacheConfiguration};
use crate::domain::class_loader::ClassLoader;
use crate::domain::service::ServiceConfiguration;
use crate::error::{CoreError, CoreResult};

/// Immutable configuration of a cache manager
pub struct DefaultConfiguration {
    caches: HashMap<String, Arc<dyn AnyCacheConfiguration>>,
    class_loader: Option<Arc<dyn ClassLoader>>,
    service_configurations: Vec<Arc<dyn ServiceConfiguration>>,
}

impl DefaultConfiguration {
    /// Resolve a configuration from the accumulated inputs
    ///
    /// Aliases must be non-empty; this is the only validation performed.
    pub fn new(
        caches: HashMap<String, Arc<dyn AnyCacheConfiguration>>,
        class_loader: Option<Arc<dyn ClassLoader>>,
        service_configurations: Vec<Arc<dyn ServiceConfiguration>>,
    ) -> CoreResult<Self> {
        if let Some(alias) = caches.keys().find(|alias| alias.trim().is_empty()) {
            return Err(CoreError::Configuration(format!(
                "cache alias must not be blank: {:?}",
                alias
            )));
        }

        debug!(
            caches = caches.len(),
            service_configurations = service_configurations.len(),
            custom_class_loader = class_loader.is_some(),
            "Resolved configuration"
        );

        Ok(Self {
            caches,
            class_loader,
            service_configurations,
        })
    }

    /// Configuration with no caches, services or class loader
    pub fn empty() -> Self {
        Self {
            caches: HashMap::new(),
            class_loader: None,
            service_configurations: Vec::new(),
        }
    }

    /// All cache configurations by alias
    pub fn cache_configurations(&self) -> &HashMap<String, Arc<dyn AnyCacheConfiguration>> {
        &self.caches
    }

    /// Typed cache configuration for `alias`
    ///
    /// Returns `None` when the alias is unknown or was registered with other
    /// key/value types.
    pub fn cache_configuration<K: 'static, V: 'static>(
        &self,
        alias: &str,
    ) -> Option<&CacheConfiguration<K, V>> {
        self.caches
            .get(alias)
            .and_then(|config| (**config).as_any().downcast_ref::<CacheConfiguration<K, V>>())
    }

    /// Configured class loader, if any
    pub fn class_loader(&self) -> Option<&Arc<dyn ClassLoader>> {
        self.class_loader.as_ref()
    }

    /// Service configurations
    pub fn service_configurations(&self) -> &[Arc<dyn ServiceConfiguration>] {
        &self.service_configurations
    }

    /// First service configuration of concrete type `C`
    pub fn find_service_configuration<C: ServiceConfiguration + 'static>(&self) -> Option<&C> {
        self.service_configurations
            .iter()
            .find_map(|config| (**config).as_any().downcast_ref::<C>())
    }
}

impl fmt::Debug for DefaultConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultConfiguration")
            .field("caches", &self.caches)
            .field("class_loader", &self.class_loader)
            .field("service_configurations", &self.service_configurations)
            .finish()
    }
}
