//! Global `tracing` subscriber setup: an `EnvFilter` plus compact or
//! JSON-lines output.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::MonitoringConfig;

/// Event filter for `config`
///
/// `RUST_LOG` wins over `config.log_filter` when set.
pub fn env_filter(config: &MonitoringConfig) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .with_context(|| format!("Invalid log filter: {}", config.log_filter))
}

/// Install the global subscriber described by `config`
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &MonitoringConfig) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(config)?);

    let installed = if config.enable_json_logging {
        let layer = fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_thread_ids(true);
        tracing::subscriber::set_global_default(registry.with(layer))
    } else {
        let layer = fmt::layer().compact().with_target(true);
        tracing::subscriber::set_global_default(registry.with(layer))
    };
    installed.context("A global tracing subscriber is already installed")?;

    info!(
        service_name = %config.service_name,
        json = config.enable_json_logging,
        "Logging initialized"
    );

    Ok(())
}
