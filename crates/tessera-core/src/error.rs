//! Error types for parameter resolution.
//!
//! [`ResolveError`] is the single error type raised while binding handler
//! parameters. Each variant belongs to an [`ErrorCategory`], which decides the
//! HTTP status the surrounding framework should answer with.
//!
//! | Variant | Category | Status |
//! |---|---|---|
//! | `Configuration` | `Internal` | 500 |
//! | `BadRequest` | `Validation` | 400 |
//! | `NotFound` | `NotFound` | 404 |
//! | `ContractViolation` | `Internal` | 500 |
//! | `MissingArgument` | `Internal` | 500 |

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::BagId;

/// Result type alias using [`ResolveError`].
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Categories of errors for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A present value failed filtering or validation.
    Validation,
    /// A value identifying a resource could not be converted.
    NotFound,
    /// Misconfiguration or programmer error.
    Internal,
}

impl ErrorCategory {
    /// Returns the default HTTP status code for this error category.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error raised while resolving a handler parameter.
///
/// # Example
///
/// ```
/// use tessera_core::{BagId, ErrorCategory, ResolveError};
///
/// let err = ResolveError::bad_request("page", "page", BagId::Query);
/// assert_eq!(err.category(), ErrorCategory::Validation);
/// assert_eq!(err.status_code(), http::StatusCode::BAD_REQUEST);
/// assert!(err.to_string().contains("page"));
/// ```
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The parameter's descriptors cannot be evaluated (unknown bag, forbidden
    /// descriptor combination, malformed filter specification).
    #[error("invalid binding configuration for parameter \"{parameter}\": {message}")]
    Configuration {
        /// Parameter being resolved.
        parameter: String,
        /// What is wrong with the configuration.
        message: String,
    },

    /// A value was present but failed filtering.
    #[error("parameter \"{name}\" is invalid")]
    BadRequest {
        /// Handler parameter name.
        parameter: String,
        /// Name looked up in the bag (after renaming).
        name: String,
        /// Bag the value came from.
        bag: BagId,
    },

    /// A value was present but does not identify anything.
    #[error("{message}")]
    NotFound {
        /// Handler parameter name.
        parameter: String,
        /// Human-readable error message.
        message: String,
    },

    /// A value producer broke the single-value contract.
    #[error("value producer {producer} returned {returned} values for a single element of \"{parameter}\"")]
    ContractViolation {
        /// Handler parameter name.
        parameter: String,
        /// Producer type name.
        producer: &'static str,
        /// Number of values it returned.
        returned: usize,
    },

    /// A required, non-nullable parameter could not be resolved.
    #[error("handler requires the \"{parameter}\" argument, but it could not be resolved")]
    MissingArgument {
        /// Handler parameter name.
        parameter: String,
    },
}

impl ResolveError {
    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Creates a bad request error for a value that failed filtering.
    #[must_use]
    pub fn bad_request(parameter: impl Into<String>, name: impl Into<String>, bag: BagId) -> Self {
        Self::BadRequest {
            parameter: parameter.into(),
            name: name.into(),
            bag,
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Creates a contract violation error.
    #[must_use]
    pub fn contract_violation(
        parameter: impl Into<String>,
        producer: &'static str,
        returned: usize,
    ) -> Self {
        Self::ContractViolation {
            parameter: parameter.into(),
            producer,
            returned,
        }
    }

    /// Creates a missing argument error.
    #[must_use]
    pub fn missing_argument(parameter: impl Into<String>) -> Self {
        Self::MissingArgument {
            parameter: parameter.into(),
        }
    }

    /// Returns the error category.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::BadRequest { .. } => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Configuration { .. }
            | Self::ContractViolation { .. }
            | Self::MissingArgument { .. } => ErrorCategory::Internal,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.category().default_status_code()
    }

    /// Returns the handler parameter this error is about.
    #[must_use]
    pub fn parameter(&self) -> &str {
        match self {
            Self::Configuration { parameter, .. }
            | Self::BadRequest { parameter, .. }
            | Self::NotFound { parameter, .. }
            | Self::ContractViolation { parameter, .. }
            | Self::MissingArgument { parameter } => parameter,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "BINDING_MISCONFIGURED",
            Self::BadRequest { .. } => "INVALID_PARAMETER",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::ContractViolation { .. } => "RESOLVER_CONTRACT_VIOLATION",
            Self::MissingArgument { .. } => "MISSING_ARGUMENT",
        }
    }

    /// Converts this error to a serializable error envelope.
    ///
    /// Internal errors keep their details out of the envelope.
    #[must_use]
    pub fn to_envelope(&self, request_id: Option<&str>) -> ErrorEnvelope {
        let message = match self.category() {
            ErrorCategory::Internal => "internal server error".to_string(),
            _ => self.to_string(),
        };
        let details = match self {
            Self::BadRequest { name, bag, .. } => Some(serde_json::json!({
                "parameter": name,
                "source": bag.as_str(),
            })),
            _ => None,
        };

        ErrorEnvelope {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message,
                category: self.category(),
                details,
            },
            request_id: request_id.map(ToString::to_string),
        }
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// The error details.
    pub error: ErrorDetail,
    /// The request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Error detail within an envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Error category.
    pub category: ErrorCategory,
    /// Additional error details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_request_error() {
        let error = ResolveError::bad_request("page", "p", BagId::Query);
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.parameter(), "page");
        assert_eq!(error.to_string(), "parameter \"p\" is invalid");
    }

    #[test]
    fn test_not_found_error() {
        let error = ResolveError::not_found("id", "the uid for the \"id\" parameter is invalid");
        assert_eq!(error.category(), ErrorCategory::NotFound);
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_internal_errors() {
        let errors = [
            ResolveError::configuration("page", "multiple descriptors"),
            ResolveError::contract_violation("page", "Custom", 2),
            ResolveError::missing_argument("page"),
        ];

        for error in errors {
            assert_eq!(error.category(), ErrorCategory::Internal);
            assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(error.parameter(), "page");
        }
    }

    #[test]
    fn test_missing_argument_message() {
        let error = ResolveError::missing_argument("foo");
        assert!(error.to_string().contains("requires the \"foo\""));
    }

    #[test]
    fn test_error_envelope_serialization() {
        let error = ResolveError::bad_request("page", "page", BagId::Query);
        let envelope = error.to_envelope(Some("req-456"));

        let json = serde_json::to_string(&envelope).expect("serialization should work");
        assert!(json.contains("\"code\":\"INVALID_PARAMETER\""));
        assert!(json.contains("\"request_id\":\"req-456\""));
        assert!(json.contains("\"category\":\"validation\""));
        assert!(json.contains("\"source\":\"query\""));
    }

    #[test]
    fn test_envelope_hides_internal_details() {
        let error = ResolveError::configuration("page", "unknown bag \"cookies\"");
        let envelope = error.to_envelope(None);

        assert_eq!(envelope.error.message, "internal server error");
        assert!(envelope.error.details.is_none());
    }

    #[test]
    fn test_all_error_categories_have_status_codes() {
        let categories = [
            ErrorCategory::Validation,
            ErrorCategory::NotFound,
            ErrorCategory::Internal,
        ];

        for category in categories {
            let status = category.default_status_code();
            assert!(
                status.is_client_error() || status.is_server_error(),
                "Category {:?} should map to error status code, got {}",
                category,
                status
            );
        }
    }
}
