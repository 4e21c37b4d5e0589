//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tessera_telemetry::{LogConfig, LogOutput};

/// How multiple source descriptors on one parameter are combined.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DescriptorPolicy {
    /// Descriptors form an ordered fallback chain. A descriptor whose bag lacks
    /// the value, or whose value fails filtering without throwing, passes
    /// control to the next one.
    #[default]
    Chain,
    /// Exactly one descriptor is allowed per parameter.
    Single,
}

impl DescriptorPolicy {
    /// Returns the policy name as used in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chain => "chain",
            Self::Single => "single",
        }
    }
}

impl fmt::Display for DescriptorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DescriptorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chain" => Ok(Self::Chain),
            "single" => Ok(Self::Single),
            other => Err(format!("unknown descriptor policy: {other}")),
        }
    }
}

/// Parameter resolution configuration section.
///
/// The defaults here are the ones applied by the attribute-style descriptor
/// constructors (`from_query`, `from_body`, ...). Bare bag descriptors always
/// start without flags and without throwing.
///
/// # Example
///
/// ```
/// use tessera_config::{DescriptorPolicy, ResolverConfig};
///
/// let config = ResolverConfig {
///     policy: DescriptorPolicy::Single,
///     ..Default::default()
/// };
/// assert!(config.empty_string_as_null);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ResolverConfig {
    /// Combination policy for repeated descriptors.
    #[serde(default)]
    pub policy: DescriptorPolicy,

    /// Treat empty strings as null for attribute-style descriptors.
    #[serde(default = "default_true")]
    pub empty_string_as_null: bool,

    /// Fail with a bad request when a present value fails filtering.
    #[serde(default = "default_true")]
    pub throw_on_filter_failure: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            policy: DescriptorPolicy::default(),
            empty_string_as_null: true,
            throw_on_filter_failure: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// JSON lines.
    #[default]
    Json,
    /// Human readable, multi-line.
    Pretty,
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or `EnvFilter` directive.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include file and line number in log records.
    #[serde(default)]
    pub include_location: bool,

    /// Emit span open/close events.
    #[serde(default)]
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
            span_events: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    /// Converts this section into the telemetry crate's logging settings.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            filter: self.level.clone(),
            output: match self.format {
                LogFormat::Json => LogOutput::Json,
                LogFormat::Pretty => LogOutput::Pretty,
            },
            span_events: self.span_events,
            source_location: self.include_location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolver_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.policy, DescriptorPolicy::Chain);
        assert!(config.empty_string_as_null);
        assert!(config.throw_on_filter_failure);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("chain".parse::<DescriptorPolicy>(), Ok(DescriptorPolicy::Chain));
        assert_eq!("SINGLE".parse::<DescriptorPolicy>(), Ok(DescriptorPolicy::Single));
        assert!("first".parse::<DescriptorPolicy>().is_err());
        assert_eq!(DescriptorPolicy::Single.to_string(), "single");
    }

    #[test]
    fn test_resolver_deny_unknown_fields() {
        let result: Result<ResolverConfig, _> =
            serde_json::from_str(r#"{"policy": "chain", "fallthrough": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolver_partial_json() {
        let config: ResolverConfig = serde_json::from_str(r#"{"policy": "single"}"#).unwrap();
        assert_eq!(config.policy, DescriptorPolicy::Single);
        assert!(config.throw_on_filter_failure);
    }

    #[test]
    fn test_logging_to_log_config() {
        let section = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            ..Default::default()
        };

        let log = section.to_log_config();
        assert_eq!(log.filter, "debug");
        assert_eq!(log.output, LogOutput::Pretty);
        assert!(log.source_location);
        assert!(!log.span_events);
    }
}
