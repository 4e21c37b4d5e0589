//! Logging setup for Tessera.
//!
//! Resolution code emits `tracing` events with structured fields
//! (`parameter`, `bag`, `name`). This crate installs a `tracing-subscriber`
//! registry that renders them as JSON (production) or pretty text
//! (development), filtered through an [`EnvFilter`](tracing_subscriber::EnvFilter).
//!
//! # Example
//!
//! ```rust,ignore
//! use tessera_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! tracing::debug!(parameter = "page", bag = "query", "resolving parameter");
//! ```

#![doc(html_root_url = "https://docs.rs/tessera-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{build_layer, create_env_filter, init_logging, LogConfig, LogOutput};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
