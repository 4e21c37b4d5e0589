//! # Tessera Serializer
//!
//! Normalizers turning typed values into plain serializable data and back.
//!
//! [`UnitEnumNormalizer`] maps enumeration cases to their names.

#![doc(html_root_url = "https://docs.rs/tessera-serializer/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod unit_enum;

pub use error::{NormalizerError, NormalizerResult};
pub use unit_enum::{NormalizerContext, UnitEnumNormalizer};
