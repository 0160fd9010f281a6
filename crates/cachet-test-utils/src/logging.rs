//! Logging setup for tests.

use cachet_monitoring::{env_filter, MonitoringConfig};

/// Install a test-friendly subscriber once; later calls are ignored.
///
/// Reads the monitoring configuration from the environment, defaulting the
/// filter to `cachet_core=debug`. `RUST_LOG` still wins.
pub fn init_test_logging() {
    let mut config = MonitoringConfig::from_env();
    if std::env::var_os("CACHET_LOG_FILTER").is_none() {
        config.log_filter = "cachet_core=debug".to_string();
    }

    let Ok(filter) = env_filter(&config) else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
