use actctx_config::LogFormat;
use actctx_config::logging::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. RUST_LOG takes precedence over the config filter.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.filter));
    let ansi = atty::is(atty::Stream::Stderr);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi);

    match config.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }

    tracing::debug!(format = %config.format, "logging initialized");
}
