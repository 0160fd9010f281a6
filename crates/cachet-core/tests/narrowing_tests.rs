use std::sync::Arc;

use cachet_core::{
    CacheManager, CacheManagerBuilder, CacheManagerConfiguration, CacheManagerHandle, CoreError,
    CoreResult, ManagerHandle, Narrows, PersistentCacheManagerHandle, Status,
};
use cachet_test_utils::{cache_config, RecordingService, TagConfiguration};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// A manager type no builder ever produces.
#[allow(dead_code)]
struct ClusteredCacheManager {
    cluster: String,
}

/// Handle promising a clustered manager.
#[derive(Clone)]
struct ClusteredCacheManagerHandle {
    manager: Arc<dyn CacheManager>,
}

impl ClusteredCacheManagerHandle {
    fn cluster_name(&self) -> CoreResult<String> {
        (*self.manager)
            .as_any()
            .downcast_ref::<ClusteredCacheManager>()
            .map(|m| m.cluster.clone())
            .ok_or_else(|| CoreError::TypeMismatch("not a clustered manager".to_string()))
    }
}

impl ManagerHandle for ClusteredCacheManagerHandle {
    fn cast_unchecked(manager: Arc<dyn CacheManager>) -> Self {
        Self { manager }
    }

    fn manager(&self) -> &Arc<dyn CacheManager> {
        &self.manager
    }

    fn is_satisfied_by(manager: &dyn CacheManager) -> bool {
        manager.as_any().is::<ClusteredCacheManager>()
    }
}

impl Narrows<CacheManagerHandle> for ClusteredCacheManagerHandle {}

/// Combinator claiming clustering without providing it.
struct Clustering {
    uri: String,
}

impl CacheManagerConfiguration<ClusteredCacheManagerHandle> for Clustering {
    fn builder<T>(
        &self,
        builder: CacheManagerBuilder<T>,
    ) -> CacheManagerBuilder<ClusteredCacheManagerHandle>
    where
        T: ManagerHandle,
        ClusteredCacheManagerHandle: Narrows<T>,
    {
        builder
            .using_service_config(TagConfiguration::new(self.uri.clone()))
            .specialize()
    }
}

fn clustering() -> Clustering {
    Clustering {
        uri: "terracotta://cluster/orders".to_string(),
    }
}

#[test]
fn test_persistence_combinator_narrows_handle() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("store");

    let builder: CacheManagerBuilder<PersistentCacheManagerHandle> =
        CacheManagerBuilder::new_cache_manager_builder()
            .with_cache("orders", cache_config::<u64, String>(10))
            .with(CacheManagerBuilder::persistence(&root));

    // State accumulated before narrowing survives it.
    assert_eq!(builder.cache_aliases(), vec!["orders"]);
    assert_eq!(builder.service_config_count(), 1);

    let manager = builder.build(false).unwrap();
    assert_eq!(manager.root_directory().unwrap(), Some(root.as_path()));
    assert_eq!(manager.status(), Status::Uninitialized);
}

#[test]
fn test_narrowed_builder_keeps_accepting_registrations() {
    let dir = TempDir::new().unwrap();
    let service = Arc::new(RecordingService::new());

    let manager = CacheManagerBuilder::new_cache_manager_builder()
        .with(CacheManagerBuilder::persistence(dir.path()))
        .with_cache("orders", cache_config::<u64, String>(10))
        .using(service.clone())
        .using_service_config(TagConfiguration::new("late"))
        .build(true)
        .unwrap();

    assert_eq!(manager.configuration().cache_configurations().len(), 1);
    assert_eq!(manager.configuration().service_configurations().len(), 2);
    assert_eq!(service.starts(), 1);
}

#[test]
fn test_reapplying_persistence_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let persistence = CacheManagerBuilder::persistence(dir.path());

    let builder = CacheManagerBuilder::new_cache_manager_builder()
        .with(persistence.clone())
        .with(persistence);

    assert_eq!(builder.service_config_count(), 1);
}

#[test]
fn test_persistent_handle_widens_to_general_handle() {
    let dir = TempDir::new().unwrap();
    let persistent = CacheManagerBuilder::new_cache_manager_builder()
        .with(CacheManagerBuilder::persistence(dir.path()))
        .build(false)
        .unwrap();
    let id = persistent.id();

    let general: CacheManagerHandle = persistent.into();
    assert_eq!(general.id(), id);
}

#[test]
fn test_rogue_combinator_builds_but_fails_on_first_use() {
    let manager = CacheManagerBuilder::new_cache_manager_builder()
        .with(clustering())
        .build(true)
        .unwrap();

    // Construction and initialization succeed on the unchecked path.
    assert_eq!(manager.manager().status(), Status::Available);

    match manager.cluster_name() {
        Err(CoreError::TypeMismatch(_)) => {}
        other => panic!("Expected TypeMismatch error, got {:?}", other),
    }
}

#[test]
fn test_checked_build_rejects_rogue_combinator_before_init() {
    let service = Arc::new(RecordingService::new());
    let result = CacheManagerBuilder::new_cache_manager_builder()
        .using(service.clone())
        .with(clustering())
        .build_checked(true);

    assert!(matches!(result, Err(CoreError::TypeMismatch(_))));
    assert_eq!(service.starts(), 0);
}

#[test]
fn test_checked_build_accepts_persistent_handle() {
    let dir = TempDir::new().unwrap();
    let manager = CacheManagerBuilder::new_cache_manager_builder()
        .with(CacheManagerBuilder::persistence(dir.path()))
        .build_checked(true)
        .unwrap();

    assert_eq!(manager.status(), Status::Available);
    assert!(manager.root_directory().is_ok());
}

#[test]
fn test_checked_cast_of_general_handle() {
    let general = CacheManagerBuilder::new_cache_manager_builder()
        .build(false)
        .unwrap();

    // Every built manager is persistent capable.
    let persistent = PersistentCacheManagerHandle::try_cast(general.manager().clone()).unwrap();
    assert_eq!(persistent.root_directory().unwrap(), None);

    let clustered = ClusteredCacheManagerHandle::try_cast(general.manager().clone());
    assert!(matches!(clustered, Err(CoreError::TypeMismatch(_))));
}
