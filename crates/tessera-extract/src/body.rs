//! Request payload decoding.
//!
//! The body bag is filled from JSON objects (`application/json` and `+json`
//! types) and URL-encoded forms. Other content types leave it empty;
//! multipart bodies are loaded separately because they are read
//! asynchronously.

use bytes::Bytes;
use tessera_core::{BagId, Value};

use crate::query::parse_urlencoded;
use crate::{ExtractionError, ParameterBag};

/// Default maximum body size decoded into the body bag (1 MB).
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 1024 * 1024;

/// Payload encodings understood by [`parse_payload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// JSON document.
    Json,
    /// `application/x-www-form-urlencoded`.
    Form,
    /// `multipart/form-data`, loaded asynchronously.
    Multipart,
    /// Anything else; not decoded.
    Other,
}

impl PayloadKind {
    /// Classifies a `Content-Type` header value.
    #[must_use]
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let Some(parsed) = content_type.and_then(|ct| ct.parse::<mime::Mime>().ok()) else {
            return Self::Other;
        };

        let (type_, subtype) = (parsed.type_(), parsed.subtype());
        if type_ == mime::APPLICATION && (subtype == mime::JSON || parsed.suffix() == Some(mime::JSON)) {
            Self::Json
        } else if type_ == mime::APPLICATION && subtype == mime::WWW_FORM_URLENCODED {
            Self::Form
        } else if type_ == mime::MULTIPART && subtype == mime::FORM_DATA {
            Self::Multipart
        } else {
            Self::Other
        }
    }
}

/// Decodes a request body into the body bag.
///
/// An empty body yields an empty bag. JSON bodies must be objects.
///
/// # Errors
///
/// Returns [`ExtractionError`] if the body exceeds `max_size` or cannot be
/// decoded.
///
/// # Example
///
/// ```rust
/// use bytes::Bytes;
/// use tessera_core::Value;
/// use tessera_extract::{parse_payload, DEFAULT_MAX_PAYLOAD_SIZE};
///
/// let body = Bytes::from_static(br#"{"foo": "bar"}"#);
/// let bag = parse_payload(Some("application/json"), &body, DEFAULT_MAX_PAYLOAD_SIZE).unwrap();
/// assert_eq!(bag.get("foo"), Some(&Value::from("bar")));
/// ```
pub fn parse_payload(
    content_type: Option<&str>,
    body: &Bytes,
    max_size: usize,
) -> Result<ParameterBag, ExtractionError> {
    let kind = PayloadKind::from_content_type(content_type);
    if body.is_empty() || matches!(kind, PayloadKind::Multipart | PayloadKind::Other) {
        return Ok(ParameterBag::new());
    }

    if body.len() > max_size {
        return Err(ExtractionError::payload_too_large(max_size, body.len()));
    }

    match kind {
        PayloadKind::Json => parse_json(body),
        PayloadKind::Form => {
            let text = std::str::from_utf8(body)
                .map_err(|e| ExtractionError::malformed(BagId::Body, e.to_string()))?;
            parse_urlencoded(text, BagId::Body)
        }
        PayloadKind::Multipart | PayloadKind::Other => Ok(ParameterBag::new()),
    }
}

fn parse_json(body: &Bytes) -> Result<ParameterBag, ExtractionError> {
    let document: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ExtractionError::malformed(BagId::Body, e.to_string()))?;

    match Value::from(document) {
        Value::Map(map) => Ok(ParameterBag::from(map)),
        other => Err(ExtractionError::malformed(
            BagId::Body,
            format!("expected a JSON object, got {}", other.type_name()),
        )),
    }
}
