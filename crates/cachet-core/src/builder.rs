//! Cache manager builder
//!
//! [`CacheManagerBuilder`] accumulates cache configurations, services, service
//! configurations and a class loader, and turns them into a manager in one
//! `build` call. The accumulator stays usable afterwards: every `build` works
//! on a fresh snapshot, so later changes never reach managers already built.
//!
//! ```ignore
//! let manager = CacheManagerBuilder::new_cache_manager_builder()
//!     .with_cache("orders", CacheConfigurationBuilder::new().max_entries(10_000).build::<u64, Order>())
//!     .with(CacheManagerBuilder::persistence("/var/lib/orders"))
//!     .build(true)?;
//!
//! manager.destroy_cache("stale")?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::cache_configuration::{AnyCacheConfiguration, CacheConfiguration};
use crate::domain::class_loader::ClassLoader;
use crate::domain::configuration::DefaultConfiguration;
use crate::domain::service::{same_service, Service, ServiceConfiguration};
use crate::domain::service_locator::ServiceLocator;
use crate::error::CoreResult;
use crate::manager::default_manager::DefaultCacheManager;
use crate::manager::handle::{CacheManagerHandle, ManagerHandle, Narrows};
use crate::manager::CacheManager;
use crate::persistence::PersistenceConfiguration;

/// A capability bundle that specializes a builder
///
/// Implementations register whatever they need on the builder they receive
/// and return it re-typed to `N`. They must keep the state already
/// accumulated on that builder.
pub trait CacheManagerConfiguration<N: ManagerHandle> {
    /// Specialize `builder` to produce `N`
    fn builder<T>(&self, builder: CacheManagerBuilder<T>) -> CacheManagerBuilder<N>
    where
        T: ManagerHandle,
        N: Narrows<T>;
}

/// Fluent accumulator producing managers typed as `T`
pub struct CacheManagerBuilder<T: ManagerHandle = CacheManagerHandle> {
    caches: HashMap<String, Arc<dyn AnyCacheConfiguration>>,
    services: Vec<Arc<dyn Service>>,
    service_configurations: Vec<Arc<dyn ServiceConfiguration>>,
    class_loader: Option<Arc<dyn ClassLoader>>,
    _handle: PhantomData<fn() -> T>,
}

impl CacheManagerBuilder<CacheManagerHandle> {
    /// Empty builder producing general manager handles.
    pub fn new_cache_manager_builder() -> Self {
        Self {
            caches: HashMap::new(),
            services: Vec::new(),
            service_configurations: Vec::new(),
            class_loader: None,
            _handle: PhantomData,
        }
    }

    /// Construct a manager straight from a resolved configuration.
    ///
    /// No explicit locator is involved: services come only from the defaults
    /// named by the configuration's service configurations. The manager is
    /// not initialized.
    pub fn new_cache_manager(configuration: DefaultConfiguration) -> CoreResult<CacheManagerHandle> {
        let manager: Arc<dyn CacheManager> = Arc::new(DefaultCacheManager::new(configuration)?);
        Ok(CacheManagerHandle::cast_unchecked(manager))
    }

    /// Persistence configuration rooted at `location`. The path is not checked.
    pub fn persistence(location: impl Into<PathBuf>) -> PersistenceConfiguration {
        PersistenceConfiguration::new(location)
    }
}

impl Default for CacheManagerBuilder<CacheManagerHandle> {
    fn default() -> Self {
        Self::new_cache_manager_builder()
    }
}

impl<T: ManagerHandle> CacheManagerBuilder<T> {
    /// Add or replace the cache configuration registered under `alias`.
    pub fn with_cache<K, V>(
        mut self,
        alias: impl Into<String>,
        configuration: CacheConfiguration<K, V>,
    ) -> Self
    where
        K: 'static,
        V: 'static,
    {
        let alias = alias.into();
        if self.caches.insert(alias.clone(), Arc::new(configuration)).is_some() {
            debug!(alias = %alias, "Replaced cache configuration");
        }
        self
    }

    /// Register a service instance. Registering the same instance again is a no-op.
    pub fn using(mut self, service: Arc<dyn Service>) -> Self {
        if self.services.iter().any(|known| same_service(known, &service)) {
            debug!(service = service.service_name(), "Service already registered");
        } else {
            self.services.push(service);
        }
        self
    }

    /// Register a service configuration. Registering an equal value again is a no-op.
    pub fn using_service_config<C>(mut self, configuration: C) -> Self
    where
        C: ServiceConfiguration + 'static,
    {
        let configuration: Arc<dyn ServiceConfiguration> = Arc::new(configuration);
        if self
            .service_configurations
            .iter()
            .any(|known| **known == *configuration)
        {
            debug!(configuration = ?configuration, "Service configuration already registered");
        } else {
            self.service_configurations.push(configuration);
        }
        self
    }

    /// Use `class_loader` for the managers built from now on.
    pub fn with_class_loader(mut self, class_loader: Arc<dyn ClassLoader>) -> Self {
        self.class_loader = Some(class_loader);
        self
    }

    /// Clear the class loader; managers fall back to their default.
    pub fn without_class_loader(mut self) -> Self {
        self.class_loader = None;
        self
    }

    /// Apply a specialization combinator.
    pub fn with<N, C>(self, configuration: C) -> CacheManagerBuilder<N>
    where
        N: Narrows<T>,
        C: CacheManagerConfiguration<N>,
    {
        configuration.builder(self)
    }

    /// Re-type the builder to a narrower handle, keeping all accumulated state.
    pub fn specialize<N: Narrows<T>>(self) -> CacheManagerBuilder<N> {
        CacheManagerBuilder {
            caches: self.caches,
            services: self.services,
            service_configurations: self.service_configurations,
            class_loader: self.class_loader,
            _handle: PhantomData,
        }
    }

    /// Build a manager from a snapshot of the current state.
    ///
    /// With `init` set the manager is initialized before it is returned; an
    /// initialization failure is returned instead of the manager. The result
    /// is cast to `T` without checking the manager satisfies it, see
    /// [`CacheManagerBuilder::build_checked`].
    pub fn build(&self, init: bool) -> CoreResult<T> {
        let manager = self.new_manager()?;
        if init {
            manager.init()?;
        }
        Ok(T::cast_unchecked(manager))
    }

    /// Like [`CacheManagerBuilder::build`], but fails with
    /// [`CoreError::TypeMismatch`](crate::CoreError::TypeMismatch) before
    /// initialization when the manager does not satisfy `T`.
    pub fn build_checked(&self, init: bool) -> CoreResult<T> {
        let handle = T::try_cast(self.new_manager()?)?;
        if init {
            handle.manager().init()?;
        }
        Ok(handle)
    }

    fn new_manager(&self) -> CoreResult<Arc<dyn CacheManager>> {
        let service_locator = ServiceLocator::new(self.services.iter().cloned())?;
        let configuration = DefaultConfiguration::new(
            self.caches.clone(),
            self.class_loader.clone(),
            self.service_configurations.clone(),
        )?;
        let manager = DefaultCacheManager::with_locator(configuration, service_locator)?;

        info!(
            manager_id = %manager.id(),
            handle = std::any::type_name::<T>(),
            caches = self.caches.len(),
            services = self.services.len(),
            service_configurations = self.service_configurations.len(),
            "Built cache manager"
        );
        Ok(Arc::new(manager))
    }

    /// Aliases currently registered, sorted
    pub fn cache_aliases(&self) -> Vec<&str> {
        let mut aliases: Vec<&str> = self.caches.keys().map(String::as_str).collect();
        aliases.sort_unstable();
        aliases
    }

    /// Cache configuration currently registered under `alias`
    pub fn cache_configuration(&self, alias: &str) -> Option<&Arc<dyn AnyCacheConfiguration>> {
        self.caches.get(alias)
    }

    /// Number of distinct services registered
    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    /// Number of distinct service configurations registered
    pub fn service_config_count(&self) -> usize {
        self.service_configurations.len()
    }

    /// Class loader currently set
    pub fn class_loader(&self) -> Option<&Arc<dyn ClassLoader>> {
        self.class_loader.as_ref()
    }
}

impl<T: ManagerHandle> fmt::Debug for CacheManagerBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManagerBuilder")
            .field("handle", &std::any::type_name::<T>())
            .field("caches", &self.cache_aliases())
            .field("services", &self.services.len())
            .field("service_configurations", &self.service_configurations)
            .field("class_loader", &self.class_loader)
            .finish()
    }
}
