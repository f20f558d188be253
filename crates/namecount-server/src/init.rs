// Initialization utilities for server mode

use namecount_config::{LogFormat, RuntimeConfig};

/// Initialize tracing/logging from RuntimeConfig
pub(crate) fn init_tracing(config: &RuntimeConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let (level, format) = config
        .server
        .as_ref()
        .map(|s| (s.log_level.as_str(), s.log_format))
        .unwrap_or(("info", LogFormat::Text));

    let env_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Json => {
            registry.with(fmt::layer().json()).init();
        }
        LogFormat::Text => {
            registry.with(fmt::layer()).init();
        }
    }
}
