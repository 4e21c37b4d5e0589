//! Request loading errors.
//!
//! [`ExtractionError`] covers turning the raw request into parameter bags
//! (malformed bodies, multipart limits). Errors raised while resolving a
//! handler parameter are [`ResolveError`](tessera_core::ResolveError)s.

use http::StatusCode;
use std::fmt;
use tessera_core::BagId;

/// Error that occurs while loading request data into bags.
///
/// # Example
///
/// ```rust
/// use tessera_core::BagId;
/// use tessera_extract::ExtractionError;
/// use http::StatusCode;
///
/// let err = ExtractionError::malformed(BagId::Body, "expected a JSON object");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.bag(), BagId::Body);
/// ```
#[derive(Debug)]
pub struct ExtractionError {
    bag: BagId,
    kind: ExtractionErrorKind,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractionErrorKind {
    /// Payload could not be decoded
    Malformed,
    /// Body or field is too large
    PayloadTooLarge,
    /// Too many multipart fields
    TooManyFields,
    /// Content-Type is missing or unusable
    UnsupportedMediaType,
}

impl ExtractionError {
    /// Creates an error for data that could not be decoded.
    #[must_use]
    pub fn malformed(bag: BagId, details: impl Into<String>) -> Self {
        let details = details.into();
        Self {
            bag,
            kind: ExtractionErrorKind::Malformed,
            message: format!("failed to decode {bag}: {details}"),
        }
    }

    /// Creates an error for a payload that's too large.
    #[must_use]
    pub fn payload_too_large(max_size: usize, actual_size: usize) -> Self {
        Self {
            bag: BagId::Body,
            kind: ExtractionErrorKind::PayloadTooLarge,
            message: format!("payload too large: max {max_size} bytes, got {actual_size} bytes"),
        }
    }

    /// Creates an error for a multipart body with too many fields.
    #[must_use]
    pub fn too_many_fields(max_fields: usize) -> Self {
        Self {
            bag: BagId::Body,
            kind: ExtractionErrorKind::TooManyFields,
            message: format!("too many multipart fields (max {max_fields})"),
        }
    }

    /// Creates an error for a missing or unusable content type.
    #[must_use]
    pub fn unsupported_media_type(expected: &str, actual: Option<&str>) -> Self {
        let actual = actual.unwrap_or("none");
        Self {
            bag: BagId::Body,
            kind: ExtractionErrorKind::UnsupportedMediaType,
            message: format!("unsupported content type: expected '{expected}', got '{actual}'"),
        }
    }

    /// Returns the bag being loaded when the error occurred.
    #[must_use]
    pub fn bag(&self) -> BagId {
        self.bag
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ExtractionErrorKind::Malformed | ExtractionErrorKind::TooManyFields => {
                StatusCode::BAD_REQUEST
            }
            ExtractionErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ExtractionErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ExtractionErrorKind::Malformed => "MALFORMED_REQUEST",
            ExtractionErrorKind::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ExtractionErrorKind::TooManyFields => "TOO_MANY_FIELDS",
            ExtractionErrorKind::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExtractionError {}
