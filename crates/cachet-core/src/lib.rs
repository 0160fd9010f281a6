//!
//! Cachet Core - typed assembly of cache managers
//!
//! This crate collects named cache configurations, services, service
//! configurations and a class-loading context in a [`CacheManagerBuilder`],
//! and turns them into a wired, optionally initialized cache manager in a
//! single `build` call. The builder's type parameter tracks the most specific
//! manager handle the build is declared to produce; combinators such as
//! [`PersistenceConfiguration`] narrow it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain layer - configurations, services and the service locator
pub mod domain;

/// Manager runtime, lifecycle and typed handles
pub mod manager;

/// The fluent cache manager builder
pub mod builder;

/// Persistence bundle
pub mod persistence;

/// Declarative settings
pub mod settings;

/// Error types
pub mod error;

/// Type-erasure helpers
pub mod util;

// Re-export key types
pub use builder::{CacheManagerBuilder, CacheManagerConfiguration};
pub use domain::cache_configuration::{
    AnyCacheConfiguration, CacheConfiguration, CacheConfigurationBuilder,
};
pub use domain::class_loader::{default_class_loader, ClassLoader, DefaultClassLoader};
pub use domain::configuration::DefaultConfiguration;
pub use domain::service::{Service, ServiceConfiguration};
pub use domain::service_locator::ServiceLocator;
pub use error::{CoreError, CoreResult};
pub use manager::default_manager::DefaultCacheManager;
pub use manager::handle::{
    CacheManagerHandle, ManagerHandle, Narrows, PersistentCacheManagerHandle,
};
pub use manager::{CacheManager, PersistentCacheManager, Status};
pub use persistence::{LocalPersistenceService, PersistenceConfiguration};
pub use settings::{CacheSettings, ManagerSettings};
pub use util::{AsAny, DynEq};
