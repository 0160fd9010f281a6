//! Service and service-configuration contracts
//!
//! Services are runnable components the manager starts and stops. Service
//! configurations are declarative values a manager consumes to find or create
//! those services. The builder carries both without interpreting them.

use std::any::TypeId;
use std::fmt::Debug;
use std::sync::Arc;

use crate::domain::configuration::DefaultConfiguration;
use crate::error::CoreResult;
use crate::util::{short_type_name, AsAny, DynEq};

/// A runnable service owned by a manager's service locator
pub trait Service: AsAny + Send + Sync {
    /// Start the service against the manager's resolved configuration
    fn start(&self, configuration: &DefaultConfiguration) -> CoreResult<()>;

    /// Stop the service
    fn stop(&self) -> CoreResult<()>;

    /// Human readable name used in logs and errors
    fn service_name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

/// Declarative configuration consumed to construct or tune a service
///
/// Equality is by value: registering an equal configuration twice keeps one.
pub trait ServiceConfiguration: AsAny + DynEq + Debug + Send + Sync {
    /// Concrete type of the service this configuration targets, if any
    fn service_type(&self) -> Option<TypeId> {
        None
    }

    /// Service to create when the locator holds none of `service_type`
    fn default_service(&self) -> Option<Arc<dyn Service>> {
        None
    }
}

impl PartialEq for dyn ServiceConfiguration {
    fn eq(&self, other: &Self) -> bool {
        self.dyn_eq(other.as_any())
    }
}

/// Identity equality for shared services
pub(crate) fn same_service(a: &Arc<dyn Service>, b: &Arc<dyn Service>) -> bool {
    // Compare data pointers only; vtable pointers may differ across codegen units.
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Tuning(u32);

    impl ServiceConfiguration for Tuning {}

    struct Noop;

    impl Service for Noop {
        fn start(&self, _configuration: &DefaultConfiguration) -> CoreResult<()> {
            Ok(())
        }

        fn stop(&self) -> CoreResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_service_configuration_value_equality() {
        let a: Arc<dyn ServiceConfiguration> = Arc::new(Tuning(1));
        let b: Arc<dyn ServiceConfiguration> = Arc::new(Tuning(1));
        let c: Arc<dyn ServiceConfiguration> = Arc::new(Tuning(2));

        assert!(*a == *b);
        assert!(*a != *c);
    }

    #[test]
    fn test_same_service_is_identity() {
        let a: Arc<dyn Service> = Arc::new(Noop);
        let b: Arc<dyn Service> = Arc::new(Noop);

        assert!(same_service(&a, &a.clone()));
        assert!(!same_service(&a, &b));
    }

    #[test]
    fn test_default_service_name() {
        assert_eq!(Noop.service_name(), "Noop");
    }
}
