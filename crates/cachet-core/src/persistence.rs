//! Persistence bundle
//!
//! [`PersistenceConfiguration`] is both a service configuration and a
//! builder combinator: applying it with
//! [`CacheManagerBuilder::with`](crate::builder::CacheManagerBuilder::with)
//! registers it and narrows the builder to a
//! [`PersistentCacheManagerHandle`]. The matching [`LocalPersistenceService`]
//! owns the root directory on disk.

use std::any::TypeId;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::builder::{CacheManagerBuilder, CacheManagerConfiguration};
use crate::domain::configuration::DefaultConfiguration;
use crate::domain::service::{Service, ServiceConfiguration};
use crate::error::{CoreError, CoreResult};
use crate::manager::handle::{ManagerHandle, Narrows, PersistentCacheManagerHandle};

/// Location of a manager's persistent data
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersistenceConfiguration {
    root_directory: PathBuf,
}

impl PersistenceConfiguration {
    /// Wrap a root directory. The path is not checked.
    pub fn new(root_directory: impl Into<PathBuf>) -> Self {
        Self {
            root_directory: root_directory.into(),
        }
    }

    /// Root directory
    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }
}

impl ServiceConfiguration for PersistenceConfiguration {
    fn service_type(&self) -> Option<TypeId> {
        Some(TypeId::of::<LocalPersistenceService>())
    }

    fn default_service(&self) -> Option<Arc<dyn Service>> {
        Some(Arc::new(LocalPersistenceService::new(
            self.root_directory.clone(),
        )))
    }
}

impl CacheManagerConfiguration<PersistentCacheManagerHandle> for PersistenceConfiguration {
    fn builder<T>(&self, builder: CacheManagerBuilder<T>) -> CacheManagerBuilder<PersistentCacheManagerHandle>
    where
        T: ManagerHandle,
        PersistentCacheManagerHandle: Narrows<T>,
    {
        builder.using_service_config(self.clone()).specialize()
    }
}

/// Filesystem-backed persistence service
#[derive(Debug)]
pub struct LocalPersistenceService {
    root_directory: PathBuf,
}

impl LocalPersistenceService {
    /// Service rooted at `root_directory`
    pub fn new(root_directory: impl Into<PathBuf>) -> Self {
        Self {
            root_directory: root_directory.into(),
        }
    }

    /// Root directory
    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    /// Directory holding the data of cache `alias`
    pub fn cache_directory(&self, alias: &str) -> CoreResult<PathBuf> {
        if alias.is_empty()
            || alias == "."
            || alias == ".."
            || alias.contains(|c| c == '/' || c == '\\')
        {
            return Err(CoreError::Persistence(format!(
                "alias {:?} cannot name a cache directory",
                alias
            )));
        }
        Ok(self.root_directory.join(alias))
    }

    /// Remove the data directory of cache `alias`. Missing data is not an error.
    pub fn destroy(&self, alias: &str) -> CoreResult<()> {
        let directory = self.cache_directory(alias)?;
        if directory.exists() {
            fs::remove_dir_all(&directory).map_err(|e| {
                CoreError::Persistence(format!("failed to remove {}: {}", directory.display(), e))
            })?;
            info!(alias, path = %directory.display(), "Destroyed persistent cache data");
        } else {
            debug!(alias, "No persistent data to destroy");
        }
        Ok(())
    }
}

impl Service for LocalPersistenceService {
    fn start(&self, _configuration: &DefaultConfiguration) -> CoreResult<()> {
        fs::create_dir_all(&self.root_directory).map_err(|e| {
            CoreError::Persistence(format!(
                "failed to create {}: {}",
                self.root_directory.display(),
                e
            ))
        })?;
        debug!(path = %self.root_directory.display(), "Persistence root ready");
        Ok(())
    }

    fn stop(&self) -> CoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_targets_local_service() {
        let config = PersistenceConfiguration::new("/var/lib/cachet");

        assert_eq!(config.root_directory(), Path::new("/var/lib/cachet"));
        assert_eq!(config.service_type(), Some(TypeId::of::<LocalPersistenceService>()));

        let service = config.default_service().expect("default service");
        let local = (*service)
            .as_any()
            .downcast_ref::<LocalPersistenceService>()
            .expect("local persistence service");
        assert_eq!(local.root_directory(), Path::new("/var/lib/cachet"));
    }

    #[test]
    fn test_cache_directory_rejects_path_aliases() {
        let service = LocalPersistenceService::new("/tmp/root");

        assert_eq!(service.cache_directory("orders").unwrap(), Path::new("/tmp/root/orders"));
        for alias in ["", ".", "..", "a/b", "a\\b"] {
            assert!(
                matches!(service.cache_directory(alias), Err(CoreError::Persistence(_))),
                "alias {:?} should be rejected",
                alias
            );
        }
    }

    #[test]
    fn test_start_creates_root_and_destroy_removes_cache() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path().join("store");
        let service = LocalPersistenceService::new(&root);

        service.start(&DefaultConfiguration::empty()).unwrap();
        assert!(root.is_dir());

        fs::create_dir_all(root.join("orders")).unwrap();
        fs::write(root.join("orders").join("segment.dat"), b"data").unwrap();

        service.destroy("orders").unwrap();
        assert!(!root.join("orders").exists());

        // Destroying twice is fine.
        service.destroy("orders").unwrap();
    }
}
