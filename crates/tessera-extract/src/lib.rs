//! # Tessera Extract
//!
//! Binds handler parameters to values taken from an HTTP request.
//!
//! A request is split into [`ParameterBag`]s (route attributes, query, body,
//! headers and files) held by an [`ExtractionContext`]. Each handler
//! parameter is described by [`ArgumentMetadata`]: its declared type and an
//! ordered list of [`SourceDescriptor`]s naming where the value may come from
//! and how it should be filtered.
//!
//! | Piece | Role |
//! |-------|------|
//! | [`filter_value`] | Validates and sanitizes raw values |
//! | [`BagResolver`] | Walks descriptors, filters, then hands values to a [`ValueProducer`] |
//! | [`producers`] | Conversions to enums, date-times, UUIDs, or plain values |
//! | [`ArgumentResolver`] | Runs resolvers in order and applies defaults |
//!
//! ## Example
//!
//! ```rust
//! use tessera_core::{DeclaredType, Value};
//! use tessera_extract::{
//!     ArgumentMetadata, ArgumentResolver, ExtractionContext, FilterFlags, SourceDescriptor,
//! };
//!
//! let ctx = ExtractionContext::builder()
//!     .uri("/users?limit=0x10".parse().unwrap())
//!     .attribute("id", "42")
//!     .build()
//!     .unwrap();
//!
//! let arguments = [
//!     ArgumentMetadata::builder("id")
//!         .declared_type(DeclaredType::Int)
//!         .build(),
//!     ArgumentMetadata::builder("limit")
//!         .declared_type(DeclaredType::Int)
//!         .descriptor(SourceDescriptor::from_query().with_flags(FilterFlags::ALLOW_HEX))
//!         .build(),
//! ];
//!
//! let values = ArgumentResolver::default()
//!     .resolve_arguments(&ctx, &arguments)
//!     .unwrap();
//! assert_eq!(values, vec![Value::Int(42), Value::Int(16)]);
//! ```
//!
//! ## Errors
//!
//! Building a context fails with [`ExtractionError`] when the request payload
//! cannot be decoded. Resolution fails with [`tessera_core::ResolveError`].

#![doc(html_root_url = "https://docs.rs/tessera-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod arguments;
mod bag;
mod body;
mod clock;
mod context;
mod descriptor;
mod error;
mod filter;
mod header;
mod metadata;
mod multipart;
pub mod producers;
mod query;
mod resolver;

pub use arguments::ArgumentResolver;
pub use bag::ParameterBag;
pub use body::{parse_payload, PayloadKind, DEFAULT_MAX_PAYLOAD_SIZE};
pub use clock::{Clock, FixedClock, SystemClock};
pub use context::{ExtractionContext, ExtractionContextBuilder};
pub use descriptor::{
    DescriptorDefaults, FieldFilter, FilterFlags, FilterKind, FilterMap, FilterOptions,
    FilterSpec, SourceDescriptor, WILDCARD,
};
pub use error::ExtractionError;
pub use filter::filter_value;
pub use header::header_bag;
pub use metadata::{ArgumentMetadata, ArgumentMetadataBuilder, DateTimeFormat};
pub use multipart::{Multipart, MultipartBags, MultipartConfig};
pub use query::{parse_query, MAX_NESTING_DEPTH};
pub use resolver::{BagResolver, ValueProducer, ValueResolver};
