//! Class-loading context
//!
//! A loader decides which key and value types a manager may materialize.
//! Managers fall back to [`DefaultClassLoader`] when none is configured.

use std::fmt::Debug;
use std::sync::Arc;

/// Resolves key and value types for the caches of a manager
pub trait ClassLoader: Debug + Send + Sync {
    /// Name of the loader
    fn name(&self) -> &str;

    /// Whether the loader can materialize values of the named type
    fn can_load(&self, type_name: &str) -> bool;
}

/// Loader that accepts every type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultClassLoader;

impl ClassLoader for DefaultClassLoader {
    fn name(&self) -> &str {
        "default"
    }

    fn can_load(&self, _type_name: &str) -> bool {
        true
    }
}

/// Shared handle to the default loader
pub fn default_class_loader() -> Arc<dyn ClassLoader> {
    Arc::new(DefaultClassLoader)
}
