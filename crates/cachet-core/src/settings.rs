//! Declarative manager settings
//!
//! Settings describe caches and persistence in YAML, with environment
//! overrides, and are turned into a [`CacheManagerBuilder`]. Caches declared
//! this way are keyed by `String` and hold raw bytes.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::builder::CacheManagerBuilder;
use crate::domain::cache_configuration::CacheConfigurationBuilder;
use crate::error::{CoreError, CoreResult};
use crate::manager::handle::CacheManagerHandle;
use crate::persistence::PersistenceConfiguration;

/// Settings of one declared cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Entry capacity; unbounded when absent
    #[serde(default)]
    pub max_entries: Option<u64>,
}

/// Settings of a cache manager
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerSettings {
    /// Caches by alias
    #[serde(default)]
    pub caches: BTreeMap<String, CacheSettings>,

    /// Root of persistent data; persistence is off when absent
    #[serde(default)]
    pub persistence_directory: Option<PathBuf>,
}

impl ManagerSettings {
    /// Parse and validate YAML settings
    pub fn from_yaml_str(yaml: &str) -> CoreResult<Self> {
        let settings: Self = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file, then apply environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let mut settings: Self = serde_yaml::from_str(&contents)?;
        settings.apply_env_overrides();
        settings.validate()?;
        info!(
            path = %path.display(),
            caches = settings.caches.len(),
            persistent = settings.persistence_directory.is_some(),
            "Loaded manager settings"
        );
        Ok(settings)
    }

    /// Override settings from `CACHET_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Override settings from an arbitrary key lookup
    ///
    /// `CACHET_PERSISTENCE_DIR` sets the persistence directory and
    /// `CACHET_PERSISTENCE_DISABLED` (`true`/`1`) clears it.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("CACHET_PERSISTENCE_DIR") {
            if dir.trim().is_empty() {
                warn!("Ignoring empty CACHET_PERSISTENCE_DIR");
            } else {
                self.persistence_directory = Some(PathBuf::from(dir));
            }
        }

        if let Some(disabled) = lookup("CACHET_PERSISTENCE_DISABLED") {
            match disabled.to_lowercase().as_str() {
                "true" | "1" => self.persistence_directory = None,
                "false" | "0" => {}
                _ => warn!("Invalid CACHET_PERSISTENCE_DISABLED value: {}", disabled),
            }
        }
    }

    /// Check aliases and capacities
    pub fn validate(&self) -> CoreResult<()> {
        for (alias, cache) in &self.caches {
            if alias.trim().is_empty() {
                return Err(CoreError::Settings("cache alias must not be blank".to_string()));
            }
            if cache.max_entries == Some(0) {
                return Err(CoreError::Settings(format!(
                    "cache {} must allow at least one entry",
                    alias
                )));
            }
        }
        Ok(())
    }

    /// Persistence configuration, when a directory is set
    pub fn persistence_configuration(&self) -> Option<PersistenceConfiguration> {
        self.persistence_directory
            .as_ref()
            .map(PersistenceConfiguration::new)
    }

    /// Builder with every declared cache registered
    ///
    /// Persistence is not applied here since it changes the builder type;
    /// use [`ManagerSettings::persistence_configuration`] with
    /// [`CacheManagerBuilder::with`].
    pub fn to_builder(&self) -> CacheManagerBuilder<CacheManagerHandle> {
        self.caches.iter().fold(
            CacheManagerBuilder::new_cache_manager_builder(),
            |builder, (alias, cache)| {
                let mut config = CacheConfigurationBuilder::new();
                if let Some(max_entries) = cache.max_entries {
                    config = config.max_entries(max_entries);
                }
                builder.with_cache(alias.clone(), config.build::<String, Vec<u8>>())
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    const YAML: &str = r#"
caches:
  orders:
    max_entries: 1000
  sessions: {}
persistence_directory: /var/lib/cachet
"#;

    #[test]
    fn test_parse_yaml() {
        let settings = ManagerSettings::from_yaml_str(YAML).unwrap();

        assert_eq!(settings.caches.len(), 2);
        assert_eq!(settings.caches["orders"].max_entries, Some(1000));
        assert_eq!(settings.caches["sessions"], CacheSettings::default());
        assert_eq!(
            settings.persistence_directory,
            Some(PathBuf::from("/var/lib/cachet"))
        );
    }

    #[test]
    fn test_invalid_yaml_is_settings_error() {
        let result = ManagerSettings::from_yaml_str("caches: [1, 2");
        assert!(matches!(result, Err(CoreError::Settings(_))));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let result = ManagerSettings::from_yaml_str("caches:\n  orders:\n    max_entries: 0\n");
        match result {
            Err(CoreError::Settings(msg)) => assert!(msg.contains("orders")),
            other => panic!("Expected Settings error, got {:?}", other),
        }
    }

    #[test]
    fn test_overrides() {
        let mut settings = ManagerSettings::default();
        let vars: HashMap<&str, &str> = [("CACHET_PERSISTENCE_DIR", "/data/cache")].into();
        settings.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(settings.persistence_directory, Some(PathBuf::from("/data/cache")));

        let vars: HashMap<&str, &str> = [("CACHET_PERSISTENCE_DISABLED", "true")].into();
        settings.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(settings.persistence_directory, None);
    }

    #[test]
    fn test_to_builder_registers_caches() {
        let settings = ManagerSettings::from_yaml_str(YAML).unwrap();
        let builder = settings.to_builder();

        assert_eq!(builder.cache_aliases(), vec!["orders", "sessions"]);
        assert_eq!(
            builder.cache_configuration("orders").and_then(|c| c.max_entries()),
            Some(1000)
        );
        assert_eq!(
            settings.persistence_configuration(),
            Some(PersistenceConfiguration::new("/var/lib/cachet"))
        );
    }

    #[test]
    fn test_from_file_rejects_blank_alias() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cachet.yaml");
        fs::write(&path, "caches:\n  \"\": {}\n").unwrap();

        match ManagerSettings::from_file(&path) {
            Err(CoreError::Settings(msg)) => assert!(msg.contains("blank")),
            other => panic!("Expected Settings error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cachet.yaml");
        fs::write(&path, "caches:\n  users: {}\n").unwrap();

        let settings = ManagerSettings::from_file(&path).unwrap();
        assert!(settings.caches.contains_key("users"));
    }
}
