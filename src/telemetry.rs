//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::{Result, ShowcaseError};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level when set, so a single module can
/// be turned up without touching the config file.
pub fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("showcase={},tower_http=warn", logging.level)));

    let result = match logging.format.as_str() {
        "json" => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init(),
        _ => tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .try_init(),
    };

    result.map_err(|e| ShowcaseError::general(format!("tracing init failed: {e}")))
}
