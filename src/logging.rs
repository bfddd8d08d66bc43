//! Tracing subscriber initialisation.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Environment variable overriding the configured filter directive.
pub const LOG_ENV: &str = "TRELLIS_LOG";

/// Installs the global tracing subscriber.
///
/// The filter comes from [`LOG_ENV`] when set, else from `config.filter`,
/// falling back to `warn` when neither parses.
///
/// # Errors
///
/// Returns [`TryInitError`] when a global subscriber is already installed;
/// callers that may initialise twice can ignore it.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Json => registry.with(fmt::layer().json().with_ansi(false)).try_init(),
        LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::init_tracing;
    use crate::config::{LogFormat, LoggingConfig};

    #[test]
    fn second_initialisation_is_refused() {
        let config = LoggingConfig {
            filter: "trellis=debug".to_owned(),
            format: LogFormat::Json,
        };

        let first = init_tracing(&config);
        let second = init_tracing(&LoggingConfig::default());

        assert!(first.is_ok());
        assert!(second.is_err());
    }
}
