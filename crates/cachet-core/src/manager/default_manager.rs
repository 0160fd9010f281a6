//! Default cache manager
//!
//! Owns a resolved configuration and a service locator and moves between
//! [`Status::Uninitialized`] and [`Status::Available`]. Cache storage itself
//! lives elsewhere.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::class_loader::{default_class_loader, ClassLoader};
use crate::domain::configuration::DefaultConfiguration;
use crate::domain::service_locator::ServiceLocator;
use crate::error::{CoreError, CoreResult};
use crate::manager::{CacheManager, PersistentCacheManager, Status};
use crate::persistence::{LocalPersistenceService, PersistenceConfiguration};

/// The concrete manager every builder produces
pub struct DefaultCacheManager {
    id: Uuid,
    created_at: DateTime<Utc>,
    configuration: Arc<DefaultConfiguration>,
    service_locator: ServiceLocator,
    status: Mutex<Status>,
}

impl DefaultCacheManager {
    /// Manager whose services are discovered from the configuration alone
    pub fn new(configuration: DefaultConfiguration) -> CoreResult<Self> {
        let service_locator = ServiceLocator::discover(&configuration)?;
        Ok(Self::assemble(configuration, service_locator))
    }

    /// Manager over an explicit locator
    ///
    /// Configured services the locator lacks are added from their defaults.
    pub fn with_locator(
        configuration: DefaultConfiguration,
        mut service_locator: ServiceLocator,
    ) -> CoreResult<Self> {
        service_locator.add_defaults(&configuration)?;
        Ok(Self::assemble(configuration, service_locator))
    }

    fn assemble(configuration: DefaultConfiguration, service_locator: ServiceLocator) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            configuration: Arc::new(configuration),
            service_locator,
            status: Mutex::new(Status::Uninitialized),
        }
    }

    /// Creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn check_cache_types(&self) -> CoreResult<()> {
        let loader = self.class_loader();
        for (alias, cache) in self.configuration.cache_configurations() {
            for type_name in [cache.key_type_name(), cache.value_type_name()] {
                if !loader.can_load(type_name) {
                    return Err(CoreError::Configuration(format!(
                        "class loader {} cannot load {} for cache {}",
                        loader.name(),
                        type_name,
                        alias
                    )));
                }
            }
        }
        Ok(())
    }
}

impl CacheManager for DefaultCacheManager {
    fn id(&self) -> Uuid {
        self.id
    }

    fn status(&self) -> Status {
        *self.status.lock()
    }

    fn init(&self) -> CoreResult<()> {
        let mut status = self.status.lock();
        if *status == Status::Available {
            return Err(CoreError::IllegalState(format!(
                "manager {} is already initialized",
                self.id
            )));
        }

        if let Err(e) = self
            .check_cache_types()
            .and_then(|_| self.service_locator.start_all(&self.configuration))
        {
            error!(manager_id = %self.id, error = %e, "Cache manager failed to initialize");
            return Err(e);
        }

        *status = Status::Available;
        info!(
            manager_id = %self.id,
            caches = self.configuration.cache_configurations().len(),
            services = self.service_locator.len(),
            "Cache manager initialized"
        );
        Ok(())
    }

    fn close(&self) -> CoreResult<()> {
        let mut status = self.status.lock();
        if *status == Status::Uninitialized {
            return Err(CoreError::IllegalState(format!(
                "manager {} is not initialized",
                self.id
            )));
        }

        *status = Status::Uninitialized;
        let result = self.service_locator.stop_all();
        info!(manager_id = %self.id, clean = result.is_ok(), "Cache manager closed");
        result
    }

    fn configuration(&self) -> &Arc<DefaultConfiguration> {
        &self.configuration
    }

    fn service_locator(&self) -> &ServiceLocator {
        &self.service_locator
    }

    fn class_loader(&self) -> Arc<dyn ClassLoader> {
        self.configuration
            .class_loader()
            .cloned()
            .unwrap_or_else(default_class_loader)
    }

    fn as_persistent(&self) -> Option<&dyn PersistentCacheManager> {
        Some(self)
    }
}

impl PersistentCacheManager for DefaultCacheManager {
    fn root_directory(&self) -> Option<&Path> {
        // The located service owns the data; the configuration only names a default.
        self.service_locator
            .find::<LocalPersistenceService>()
            .map(LocalPersistenceService::root_directory)
            .or_else(|| {
                self.configuration
                    .find_service_configuration::<PersistenceConfiguration>()
                    .map(PersistenceConfiguration::root_directory)
            })
    }

    fn destroy_cache(&self, alias: &str) -> CoreResult<()> {
        let service = self
            .service_locator
            .find::<LocalPersistenceService>()
            .ok_or_else(|| {
                CoreError::ServiceNotFound(format!(
                    "manager {} has no persistence service",
                    self.id
                ))
            })?;
        service.destroy(alias)
    }
}

impl fmt::Debug for DefaultCacheManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultCacheManager")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("status", &self.status())
            .field("configuration", &self.configuration)
            .field("service_locator", &self.service_locator)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::service::{Service, ServiceConfiguration};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        starts: AtomicUsize,
        stops: AtomicUsize,
    }

    impl Service for Counting {
        fn start(&self, _configuration: &DefaultConfiguration) -> CoreResult<()> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn stop(&self) -> CoreResult<()> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn manager_with(service: Arc<Counting>) -> DefaultCacheManager {
        let locator = ServiceLocator::new(vec![service as Arc<dyn Service>]).unwrap();
        DefaultCacheManager::with_locator(DefaultConfiguration::empty(), locator).unwrap()
    }

    #[test]
    fn test_lifecycle() {
        let service = Arc::new(Counting::default());
        let manager = manager_with(service.clone());

        assert_eq!(manager.status(), Status::Uninitialized);
        manager.init().unwrap();
        assert_eq!(manager.status(), Status::Available);
        assert_eq!(service.starts.load(Ordering::SeqCst), 1);

        manager.close().unwrap();
        assert_eq!(manager.status(), Status::Uninitialized);
        assert_eq!(service.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_double_init_is_illegal() {
        let manager = manager_with(Arc::new(Counting::default()));
        manager.init().unwrap();

        assert!(matches!(manager.init(), Err(CoreError::IllegalState(_))));
        assert_eq!(manager.status(), Status::Available);
    }

    #[test]
    fn test_close_before_init_is_illegal() {
        let manager = manager_with(Arc::new(Counting::default()));
        assert!(matches!(manager.close(), Err(CoreError::IllegalState(_))));
    }

    #[test]
    fn test_class_loader_defaults() {
        let manager = DefaultCacheManager::new(DefaultConfiguration::empty()).unwrap();
        assert_eq!(manager.class_loader().name(), "default");
        assert!(manager.service_locator().is_empty());
    }

    #[test]
    fn test_destroy_without_persistence_service() {
        let manager = DefaultCacheManager::new(DefaultConfiguration::empty()).unwrap();

        assert!(manager.root_directory().is_none());
        assert!(matches!(
            manager.destroy_cache("orders"),
            Err(CoreError::ServiceNotFound(_))
        ));
    }

    #[test]
    fn test_root_directory_follows_located_service() {
        let configuration = || {
            let configured: Arc<dyn ServiceConfiguration> =
                Arc::new(PersistenceConfiguration::new("/srv/configured"));
            DefaultConfiguration::new(Default::default(), None, vec![configured]).unwrap()
        };
        let explicit: Arc<dyn Service> = Arc::new(LocalPersistenceService::new("/srv/explicit"));
        let locator = ServiceLocator::new(vec![explicit]).unwrap();

        let manager = DefaultCacheManager::with_locator(configuration(), locator).unwrap();
        assert_eq!(manager.root_directory(), Some(Path::new("/srv/explicit")));

        let discovered = DefaultCacheManager::new(configuration()).unwrap();
        assert_eq!(discovered.root_directory(), Some(Path::new("/srv/configured")));
    }
}
