//! Tracing subscriber setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wb_shared::config::{LogFormat, LoggingConfig};

/// Install the global subscriber described by `config`.
///
/// Calling it again is a no-op, so tests may call it freely.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let _ = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_file(config.source_location)
                    .with_line_number(config.source_location),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_file(config.source_location)
                    .with_line_number(config.source_location),
            )
            .try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
    };
}
