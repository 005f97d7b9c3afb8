//! Logging setup using `tracing` and `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Initializes the global subscriber from configuration.
///
/// Safe to call more than once; subsequent calls are no-ops. The
/// `RUST_LOG` environment variable, when set, overrides the configured
/// level and filters entirely.
pub fn init_from_config(config: &LoggingConfig) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(env) => env,
        Err(_) => {
            let mut directives = vec![config.level.as_str().to_string()];
            for (module, level) in &config.filters {
                directives.push(format!("{module}={level}"));
            }
            EnvFilter::new(directives.join(","))
        }
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };

    // Tests and embedders may have installed a subscriber already.
    let _ = result;
}
