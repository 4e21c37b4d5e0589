//! Subscriber installation.
//!
//! # Example
//!
//! ```rust,ignore
//! use tessera_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::default())?;
//! tracing::warn!(parameter = "page", bag = "query", "value failed filtering");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Rendering of log records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogOutput {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line human readable text.
    Pretty,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Install nothing when `false`.
    pub enabled: bool,
    /// `EnvFilter` directive, e.g. `info` or `tessera_extract=debug,warn`.
    pub filter: String,
    /// Record rendering.
    pub output: LogOutput,
    /// Emit a record when a span opens and closes.
    pub span_events: bool,
    /// Include source file and line.
    pub source_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Debug level, pretty output with spans and source locations.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            filter: "debug".to_string(),
            output: LogOutput::Pretty,
            span_events: true,
            source_location: true,
        }
    }

    /// Info level, JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            filter: "info".to_string(),
            output: LogOutput::Json,
            span_events: false,
            source_location: false,
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Builds the formatting layer described by `config`, without installing it.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidConfig` for a bad filter directive.
pub fn build_layer(config: &LogConfig) -> TelemetryResult<Box<dyn Layer<Registry> + Send + Sync>> {
    let filter = create_env_filter(&config.filter)?;
    let fmt = tracing_subscriber::fmt::layer()
        .with_span_events(config.span_events())
        .with_file(config.source_location)
        .with_line_number(config.source_location)
        .with_target(true);

    Ok(match config.output {
        LogOutput::Json => fmt.json().with_filter(filter).boxed(),
        LogOutput::Pretty => fmt.pretty().with_filter(filter).boxed(),
    })
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidConfig` for a bad filter directive and
/// `TelemetryError::LoggingInit` if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(build_layer(config)?)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))
}

/// Parses an `EnvFilter` directive.
///
/// # Errors
///
/// Returns `TelemetryError::InvalidConfig` if the directive is malformed.
pub fn create_env_filter(directive: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(directive)
        .map_err(|e| TelemetryError::InvalidConfig(format!("invalid log filter \"{directive}\": {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let prod = LogConfig::default();
        assert_eq!(prod, LogConfig::production());
        assert_eq!(prod.output, LogOutput::Json);
        assert_eq!(prod.filter, "info");

        let dev = LogConfig::development();
        assert_eq!(dev.output, LogOutput::Pretty);
        assert!(dev.span_events);
        assert!(dev.source_location);
    }

    #[test]
    fn test_create_env_filter() {
        assert!(create_env_filter("info").is_ok());
        assert!(create_env_filter("tessera_extract=debug,warn").is_ok());

        let err = create_env_filter("tessera=notalevel").unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidConfig(_)));
        assert!(err.to_string().contains("tessera=notalevel"));
    }

    #[test]
    fn test_build_layer_for_each_output() {
        assert!(build_layer(&LogConfig::production()).is_ok());
        assert!(build_layer(&LogConfig::development()).is_ok());

        let broken = LogConfig {
            filter: "tessera=notalevel".to_string(),
            ..LogConfig::default()
        };
        assert!(build_layer(&broken).is_err());
    }

    #[test]
    fn test_disabled_logging_installs_nothing() {
        let config = LogConfig {
            enabled: false,
            filter: "not a directive !!".to_string(),
            ..LogConfig::default()
        };

        assert!(init_logging(&config).is_ok());
    }
}
