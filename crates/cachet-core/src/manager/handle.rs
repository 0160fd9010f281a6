//! Statically typed manager handles
//!
//! The type parameter of a [`CacheManagerBuilder`](crate::builder::CacheManagerBuilder)
//! is a [`ManagerHandle`]: the type `build` returns. Specialization moves a
//! builder from a handle `T` to a handle `N: Narrows<T>`, which the compiler
//! enforces. Whether the manager actually constructed has the capabilities `N`
//! promises is not checked by [`ManagerHandle::cast_unchecked`]; a mismatch
//! surfaces as [`CoreError::TypeMismatch`] when a capability is first used.
//! [`ManagerHandle::try_cast`] is the checked alternative.

use std::fmt;
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::manager::{CacheManager, PersistentCacheManager};

/// A statically typed view over a built manager
pub trait ManagerHandle: Sized + Send + Sync + 'static {
    /// Wrap a manager without verifying it satisfies this handle.
    fn cast_unchecked(manager: Arc<dyn CacheManager>) -> Self;

    /// The wrapped manager
    fn manager(&self) -> &Arc<dyn CacheManager>;

    /// Whether `manager` has every capability this handle exposes
    fn is_satisfied_by(_manager: &dyn CacheManager) -> bool {
        true
    }

    /// Wrap a manager after checking [`ManagerHandle::is_satisfied_by`].
    fn try_cast(manager: Arc<dyn CacheManager>) -> CoreResult<Self> {
        if Self::is_satisfied_by(&*manager) {
            Ok(Self::cast_unchecked(manager))
        } else {
            Err(CoreError::TypeMismatch(format!(
                "manager {} does not satisfy {}",
                manager.id(),
                std::any::type_name::<Self>()
            )))
        }
    }
}

/// `Self` is a handle at least as specific as `T`
pub trait Narrows<T: ManagerHandle>: ManagerHandle {}

impl<T: ManagerHandle> Narrows<T> for T {}

/// The most general manager handle
#[derive(Clone)]
pub struct CacheManagerHandle {
    manager: Arc<dyn CacheManager>,
}

impl ManagerHandle for CacheManagerHandle {
    fn cast_unchecked(manager: Arc<dyn CacheManager>) -> Self {
        Self { manager }
    }

    fn manager(&self) -> &Arc<dyn CacheManager> {
        &self.manager
    }
}

impl Deref for CacheManagerHandle {
    type Target = dyn CacheManager;

    fn deref(&self) -> &Self::Target {
        &*self.manager
    }
}

impl fmt::Debug for CacheManagerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManagerHandle")
            .field("id", &self.manager.id())
            .field("status", &self.manager.status())
            .finish()
    }
}

/// Handle to a manager with persistent capabilities
#[derive(Clone)]
pub struct PersistentCacheManagerHandle {
    manager: Arc<dyn CacheManager>,
}

impl PersistentCacheManagerHandle {
    fn persistent(&self) -> CoreResult<&dyn PersistentCacheManager> {
        self.manager.as_persistent().ok_or_else(|| {
            CoreError::TypeMismatch(format!(
                "manager {} is not a persistent cache manager",
                self.manager.id()
            ))
        })
    }

    /// Remove the persistent data of cache `alias`
    pub fn destroy_cache(&self, alias: &str) -> CoreResult<()> {
        self.persistent()?.destroy_cache(alias)
    }

    /// Root directory of persistent data
    pub fn root_directory(&self) -> CoreResult<Option<&Path>> {
        Ok(self.persistent()?.root_directory())
    }
}

impl ManagerHandle for PersistentCacheManagerHandle {
    fn cast_unchecked(manager: Arc<dyn CacheManager>) -> Self {
        Self { manager }
    }

    fn manager(&self) -> &Arc<dyn CacheManager> {
        &self.manager
    }

    fn is_satisfied_by(manager: &dyn CacheManager) -> bool {
        manager.as_persistent().is_some()
    }
}

impl Narrows<CacheManagerHandle> for PersistentCacheManagerHandle {}

impl Deref for PersistentCacheManagerHandle {
    type Target = dyn CacheManager;

    fn deref(&self) -> &Self::Target {
        &*self.manager
    }
}

impl From<PersistentCacheManagerHandle> for CacheManagerHandle {
    fn from(handle: PersistentCacheManagerHandle) -> Self {
        Self {
            manager: handle.manager,
        }
    }
}

impl fmt::Debug for PersistentCacheManagerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentCacheManagerHandle")
            .field("id", &self.manager.id())
            .field("status", &self.manager.status())
            .finish()
    }
}
