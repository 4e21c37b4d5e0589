//! # Tessera Config
//!
//! Typed configuration for Tessera.
//!
//! Configuration is layered: built-in defaults, then a TOML or JSON file,
//! then `PREFIX__SECTION__KEY` environment variables. Unknown fields are
//! rejected.
//!
//! ```no_run
//! use tessera_config::ConfigLoader;
//!
//! # fn main() -> Result<(), tessera_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_optional_file("tessera.toml")?
//!     .with_env_prefix("TESSERA")
//!     .load()?;
//!
//! tessera_telemetry::init_logging(&config.logging.to_log_config()).ok();
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Variables
//!
//! - `TESSERA__RESOLVER__POLICY=single`
//! - `TESSERA__RESOLVER__EMPTY_STRING_AS_NULL=false`
//! - `TESSERA__RESOLVER__THROW_ON_FILTER_FAILURE=false`
//! - `TESSERA__LOGGING__LEVEL=tessera_extract=debug`
//! - `TESSERA__LOGGING__FORMAT=pretty`

#![doc(html_root_url = "https://docs.rs/tessera-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::{TesseraConfig, TesseraConfigBuilder};
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::{DescriptorPolicy, LogFormat, LoggingConfig, ResolverConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = TesseraConfig::builder()
            .resolver(ResolverConfig {
                policy: DescriptorPolicy::Single,
                ..Default::default()
            })
            .build();

        assert_eq!(config.resolver.policy, DescriptorPolicy::Single);
        assert_eq!(config.logging, LoggingConfig::default());
    }
}
