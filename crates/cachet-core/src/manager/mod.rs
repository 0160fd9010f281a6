//! Cache manager runtime contracts
//!
//! The builder only relies on construction and [`CacheManager::init`]; the
//! rest of the surface exists so built managers can be inspected and shut
//! down.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::class_loader::ClassLoader;
use crate::domain::configuration::DefaultConfiguration;
use crate::domain::service_locator::ServiceLocator;
use crate::error::CoreResult;
use crate::util::AsAny;

/// Default manager implementation
pub mod default_manager;

/// Statically typed manager handles and narrowing
pub mod handle;

/// Lifecycle status of a manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Constructed but not started, or closed again
    Uninitialized,
    /// Services started and ready for use
    Available,
}

/// A cache manager runtime
pub trait CacheManager: AsAny + Send + Sync {
    /// Unique id of this manager instance
    fn id(&self) -> Uuid;

    /// Current lifecycle status
    fn status(&self) -> Status;

    /// Start the manager's services and make it available
    fn init(&self) -> CoreResult<()>;

    /// Stop the manager's services
    fn close(&self) -> CoreResult<()>;

    /// Resolved configuration snapshot the manager was built from
    fn configuration(&self) -> &Arc<DefaultConfiguration>;

    /// Services owned by the manager
    fn service_locator(&self) -> &ServiceLocator;

    /// Configured class loader, or the manager's default
    fn class_loader(&self) -> Arc<dyn ClassLoader>;

    /// Persistent capabilities, when the implementation has them
    fn as_persistent(&self) -> Option<&dyn PersistentCacheManager> {
        None
    }
}

/// A cache manager whose caches may own persistent data
pub trait PersistentCacheManager: CacheManager {
    /// Root directory of persistent data, when persistence is configured
    fn root_directory(&self) -> Option<&Path>;

    /// Remove the persistent data of the cache named `alias`
    fn destroy_cache(&self, alias: &str) -> CoreResult<()>;
}
