//! Testing utilities for cachet.
//!
//! This crate provides test implementations (fakes) of services and class
//! loaders, fixture builders for configurations, and logging setup for tests.

pub mod fixtures;
pub mod implementations;
pub mod logging;

/// Re-export commonly used types for convenience
pub use mockall;

pub use fixtures::{cache_config, TagConfiguration};
pub use implementations::class_loaders::RestrictedClassLoader;
pub use implementations::recording_service::{FailingService, RecordingService};
pub use logging::init_test_logging;
