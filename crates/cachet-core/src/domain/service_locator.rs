//! Service locator
//!
//! Holds the service instances of one manager and finds them by concrete
//! type. At most one instance per concrete type is allowed.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::domain::configuration::DefaultConfiguration;
use crate::domain::service::Service;
use crate::error::{CoreError, CoreResult};

fn concrete_type(service: &dyn Service) -> TypeId {
    Any::type_id(service.as_any())
}

/// Registry of the services owned by a manager
#[derive(Default)]
pub struct ServiceLocator {
    services: Vec<Arc<dyn Service>>,
}

impl ServiceLocator {
    /// Create a locator over the given services
    ///
    /// Fails with [`CoreError::DuplicateService`] when two instances share a
    /// concrete type.
    pub fn new<I>(services: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = Arc<dyn Service>>,
    {
        let mut locator = Self::default();
        for service in services {
            locator.add(service)?;
        }
        Ok(locator)
    }

    /// Locator holding only the default services named by `configuration`
    pub fn discover(configuration: &DefaultConfiguration) -> CoreResult<Self> {
        let mut locator = Self::default();
        locator.add_defaults(configuration)?;
        Ok(locator)
    }

    fn add(&mut self, service: Arc<dyn Service>) -> CoreResult<()> {
        let type_id = concrete_type(&*service);
        if self.contains_type(type_id) {
            return Err(CoreError::DuplicateService(format!(
                "a {} is already registered",
                service.service_name()
            )));
        }
        self.services.push(service);
        Ok(())
    }

    /// Add the default service of every configuration whose target service
    /// type is not present yet
    pub fn add_defaults(&mut self, configuration: &DefaultConfiguration) -> CoreResult<()> {
        for service_config in configuration.service_configurations() {
            let Some(service_type) = service_config.service_type() else {
                continue;
            };
            if self.contains_type(service_type) {
                continue;
            }
            if let Some(service) = service_config.default_service() {
                debug!(service = service.service_name(), "Adding default service");
                self.add(service)?;
            }
        }
        Ok(())
    }

    /// Service of concrete type `S`
    pub fn find<S: Service + 'static>(&self) -> Option<&S> {
        self.services
            .iter()
            .find_map(|service| (**service).as_any().downcast_ref::<S>())
    }

    /// Whether a service of the given concrete type is registered
    pub fn contains_type(&self, type_id: TypeId) -> bool {
        self.services
            .iter()
            .any(|service| concrete_type(&**service) == type_id)
    }

    /// Number of services
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Whether the locator holds no services
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Iterate over the services
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Service>> {
        self.services.iter()
    }

    /// Start every service in registration order
    ///
    /// On failure the services already started are stopped again, in reverse
    /// order, before the error is returned.
    pub fn start_all(&self, configuration: &DefaultConfiguration) -> CoreResult<()> {
        for (index, service) in self.services.iter().enumerate() {
            if let Err(e) = service.start(configuration) {
                error!(service = service.service_name(), error = %e, "Service failed to start");
                for started in self.services[..index].iter().rev() {
                    if let Err(stop_err) = started.stop() {
                        warn!(
                            service = started.service_name(),
                            error = %stop_err,
                            "Service failed to stop during rollback"
                        );
                    }
                }
                return Err(CoreError::ServiceStart(format!(
                    "{}: {}",
                    service.service_name(),
                    e
                )));
            }
        }
        Ok(())
    }

    /// Stop every service in reverse registration order
    ///
    /// All services are asked to stop; the first failure is returned.
    pub fn stop_all(&self) -> CoreResult<()> {
        let mut first_error = None;
        for service in self.services.iter().rev() {
            if let Err(e) = service.stop() {
                warn!(service = service.service_name(), error = %e, "Service failed to stop");
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ServiceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.services.iter().map(|service| service.service_name()))
            .finish()
    }
}
