//! # Tessera
//!
//! **Request parameter binding for HTTP handlers**
//!
//! Tessera turns a request into the argument list of a handler:
//!
//! - **Multi-bag sources** – Read a parameter from route attributes, query,
//!   body, headers or uploaded files, with ordered fallbacks
//! - **Filters** – Validate integers, floats and booleans before they reach
//!   the handler, with flags and ranges
//! - **Typed conversions** – Backed enums, date-times and UUIDs
//! - **Enum normalization** – Case names to and from enumeration values
//!
//! ## Quick Start
//!
//! ```rust
//! use tessera::prelude::*;
//!
//! let config = TesseraConfig::default();
//! let resolver = ArgumentResolver::from_config(&config.resolver);
//!
//! let ctx = ExtractionContext::builder()
//!     .uri("/articles?page=2&tag%5B%5D=rust&tag%5B%5D=http".parse().unwrap())
//!     .build()
//!     .unwrap();
//!
//! let arguments = [
//!     ArgumentMetadata::builder("page")
//!         .declared_type(DeclaredType::Int)
//!         .descriptor(SourceDescriptor::from_query())
//!         .build(),
//!     ArgumentMetadata::builder("tag")
//!         .declared_type(DeclaredType::String)
//!         .variadic(true)
//!         .descriptor(SourceDescriptor::from_query())
//!         .build(),
//! ];
//!
//! let values = resolver.resolve_arguments(&ctx, &arguments).unwrap();
//! assert_eq!(
//!     values,
//!     vec![Value::Int(2), Value::from("rust"), Value::from("http")]
//! );
//! ```
//!
//! ## Resolution
//!
//! ```text
//! descriptor → bag lookup → filter → producer → value
//!      ↓ (missing or dropped)
//! next descriptor → … → default / null / MissingArgument
//! ```

#![doc(html_root_url = "https://docs.rs/tessera/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use tessera_core as core;

// Re-export binding types
pub use tessera_extract as extract;

// Re-export normalizers
pub use tessera_serializer as serializer;

// Re-export configuration
pub use tessera_config as config;

// Re-export logging setup
pub use tessera_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use tessera::prelude::*;
/// ```
pub mod prelude {
    pub use tessera_core::{
        BagId, DeclaredType, EnumDescriptor, EnumValue, ResolveError, ResolveResult,
        UploadedFile, Value, ValueMap,
    };

    // Binding
    pub use tessera_extract::{
        ArgumentMetadata, ArgumentResolver, BagResolver, ExtractionContext, FilterFlags,
        FilterKind, FilterOptions, ParameterBag, SourceDescriptor, ValueProducer, ValueResolver,
    };

    // Normalizers
    pub use tessera_serializer::{NormalizerContext, NormalizerError, UnitEnumNormalizer};

    // Configuration
    pub use tessera_config::{ConfigLoader, DescriptorPolicy, ResolverConfig, TesseraConfig};
}
