use crate::config::{AppConfig, LogRotation};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Target of the per-unit transfer events
pub const UNIT_TARGET: &str = "RELAY_UNITS";

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

/// Install the global subscriber: plain-text file log plus coloured stdout.
///
/// Keep the returned guard alive for the life of the process, dropping it
/// flushes the file writer.
pub fn init_logging(config: &AppConfig) -> Result<WorkerGuard, InitError> {
    let file_appender = RollingFileAppender::builder()
        .rotation(config.rotation.into())
        .filename_prefix(&config.log_file)
        .build(&config.log_dir)?;
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(non_blocking)
                .with_ansi(false),
        )
        .with(fmt::layer().with_target(false).with_ansi(true))
        .init();

    Ok(guard)
}

/// Filter string for `config`; per-unit events are switched off unless
/// `enable_tracing` is set.
pub fn filter_directives(config: &AppConfig) -> String {
    let units = if config.enable_tracing { "trace" } else { "off" };
    format!("{},{UNIT_TARGET}={units}", config.log_level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RelayConfig;

    fn config(enable_tracing: bool) -> AppConfig {
        AppConfig {
            log_level: "debug".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "relay.log".to_string(),
            rotation: LogRotation::Never,
            enable_tracing,
            relay: RelayConfig::default(),
        }
    }

    #[test]
    fn test_unit_events_toggle() {
        assert_eq!(filter_directives(&config(false)), "debug,RELAY_UNITS=off");
        assert_eq!(filter_directives(&config(true)), "debug,RELAY_UNITS=trace");
    }

    #[test]
    fn test_rotation_maps_to_appender() {
        assert_eq!(Rotation::from(LogRotation::Hourly), Rotation::HOURLY);
        assert_eq!(Rotation::from(LogRotation::Daily), Rotation::DAILY);
        assert_eq!(Rotation::from(LogRotation::Never), Rotation::NEVER);
    }
}
