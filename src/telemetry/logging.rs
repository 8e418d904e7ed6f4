use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::Config;
use crate::error::Error;

/// Initialize the logging system
pub fn init_logging(config: &Config) -> Result<(), Error> {
    // Parse log level
    let log_level = match config.general.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Create environment filter
    let filter = EnvFilter::from_default_env()
        .add_directive(log_level.into());

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.general.structured_logging {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .json(),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_ansi(true),
            )
            .try_init()
    };

    result.map_err(|e| Error::Internal(format!("Failed to set global default subscriber: {}", e)))
}

/// Create a test logging subscriber
#[cfg(test)]
pub fn init_test_logging() {
    let filter = EnvFilter::from_default_env()
        .add_directive(Level::DEBUG.into());

    let fmt_layer = fmt::layer()
        .with_test_writer()
        .with_target(true)
        .with_ansi(false);

    // Several tests may race to install the subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
