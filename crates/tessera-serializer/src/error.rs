//! Normalizer errors.

use thiserror::Error;

/// Result type alias using [`NormalizerError`].
pub type NormalizerResult<T> = Result<T, NormalizerError>;

/// Error raised while normalizing or denormalizing a value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizerError {
    /// The value or target type cannot be handled by this normalizer at all.
    #[error("{0}")]
    InvalidArgument(String),

    /// The input has the wrong shape or names no known case.
    #[error("{message}")]
    NotNormalizable {
        /// Human readable description.
        message: String,
        /// Type of the rejected input.
        current_type: String,
        /// Types that would have been accepted.
        expected_types: Vec<String>,
        /// Location of the value in the document being denormalized.
        path: Option<String>,
        /// Whether `message` is safe to show to the client.
        use_message_for_user: bool,
    },
}

impl NormalizerError {
    /// Creates an [`InvalidArgument`](Self::InvalidArgument) error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Creates a [`NotNormalizable`](Self::NotNormalizable) error for input of
    /// an unexpected type or value.
    pub fn unexpected_data(
        message: impl Into<String>,
        current_type: impl Into<String>,
        expected_types: Vec<String>,
        path: Option<String>,
    ) -> Self {
        Self::NotNormalizable {
            message: message.into(),
            current_type: current_type.into(),
            expected_types,
            path,
            use_message_for_user: true,
        }
    }

    /// Returns the accepted types for a `NotNormalizable` error.
    #[must_use]
    pub fn expected_types(&self) -> &[String] {
        match self {
            Self::NotNormalizable { expected_types, .. } => expected_types,
            Self::InvalidArgument(_) => &[],
        }
    }

    /// Returns the document path for a `NotNormalizable` error.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::NotNormalizable { path, .. } => path.as_deref(),
            Self::InvalidArgument(_) => None,
        }
    }
}
