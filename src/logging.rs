//! Tracing setup for the engine binary.

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// level; `json_output` switches the format for log shippers.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let format = if config.json_output {
        fmt::layer().json().with_target(true).boxed()
    } else {
        fmt::layer().compact().with_target(true).boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_an_error() {
        let cfg = LoggingConfig::default();
        assert!(init_logging(&cfg).is_ok());
        assert!(init_logging(&cfg).is_err());
    }
}
