//! Built-in value producers.
//!
//! Each producer converts one filtered element to the parameter's declared
//! type and is run through [`BagResolver`](crate::BagResolver).

mod attribute;
mod backed_enum;
mod datetime;
mod uid;

pub use attribute::RequestAttributeProducer;
pub use backed_enum::BackedEnumProducer;
pub use datetime::DateTimeProducer;
pub use uid::UidProducer;
