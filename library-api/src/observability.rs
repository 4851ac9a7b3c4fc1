//! Structured logging setup

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::Result};

/// Install the JSON log subscriber
///
/// The filter comes from `service.log_level`, falling back to `info` when the
/// directive does not parse. Calling this again once a subscriber is
/// installed is a no-op.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            service = %config.service.name,
            environment = %config.service.environment,
            "Tracing initialized"
        );
    } else {
        tracing::debug!("Tracing subscriber already installed");
    }

    Ok(())
}
