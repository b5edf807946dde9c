//! Shared Error Types
//!
//! Errors that describe bad input independently of the transport. The backend
//! wraps them in `BackendError` and answers with 400.
//!
//! # Usage
//!
//! ```rust
//! use stanza::shared::error::SharedError;
//!
//! let error = SharedError::validation("title", "Title is required");
//! assert_eq!(error.client_message(), "Title is required");
//! ```
use thiserror::Error;

/// Shared error types that can occur in both frontend and backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Request body could not be decoded
    #[error("Malformed request body: {message}")]
    MalformedBody {
        /// Decoder message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new malformed body error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedBody {
            message: message.into(),
        }
    }

    /// The message shown to API clients.
    pub fn client_message(&self) -> String {
        match self {
            Self::ValidationError { message, .. } => message.clone(),
            Self::MalformedBody { message } => format!("Malformed request body: {message}"),
        }
    }
}

/// Return the trimmed value of a required text field.
pub fn required_text(field: &str, value: Option<&str>) -> Result<String, SharedError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(SharedError::validation(field, format!("{field} is required"))),
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed(err.to_string())
    }
}
