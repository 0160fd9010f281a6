//! Class loaders with controllable behavior.

use cachet_core::ClassLoader;

/// A class loader that only loads an explicit list of type names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictedClassLoader {
    name: String,
    allowed: Vec<String>,
}

impl RestrictedClassLoader {
    /// Creates a loader named `name` accepting only `allowed` type names.
    pub fn new<I, S>(name: impl Into<String>, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl ClassLoader for RestrictedClassLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_load(&self, type_name: &str) -> bool {
        self.allowed.iter().any(|allowed| allowed == type_name)
    }
}
