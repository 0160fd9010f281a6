//! Monitoring setup for cachet.
//!
//! Holds the logging configuration and installs the `tracing` subscriber that
//! renders the events emitted by `cachet-core`.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub mod logging;

pub use logging::{env_filter, init_logging};

/// Configuration for initializing the monitoring system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// Service name attached to the startup event
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Log level filter (e.g., "info,cachet_core=debug")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Emit JSON lines instead of human readable output
    #[serde(default)]
    pub enable_json_logging: bool,
}

fn default_service_name() -> String {
    "cachet".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            log_filter: default_log_filter(),
            enable_json_logging: false,
        }
    }
}

impl MonitoringConfig {
    /// Load configuration from `CACHET_*` environment variables over defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup over defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(service_name) = lookup("CACHET_SERVICE_NAME") {
            config.service_name = service_name;
        }

        if let Some(log_filter) = lookup("CACHET_LOG_FILTER") {
            config.log_filter = log_filter;
        }

        if let Some(json) = lookup("CACHET_LOG_JSON") {
            match json.to_lowercase().as_str() {
                "true" | "1" => config.enable_json_logging = true,
                "false" | "0" => config.enable_json_logging = false,
                _ => warn!("Invalid CACHET_LOG_JSON value: {}", json),
            }
        }

        info!(service_name = %config.service_name, "Monitoring configuration loaded");
        config
    }
}
