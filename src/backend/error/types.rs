/**
 * Backend Error Types
 *
 * This module defines the error taxonomy used at the HTTP boundary.
 *
 * # Error Categories
 *
 * ## Client errors
 *
 * - `Validation` - missing or malformed fields, duplicate email
 * - `Unauthenticated` - no credential, or one that maps to no live user
 * - `Unauthorized` - a valid user acting on someone else's poem
 * - `NotFound` - unknown poem or user
 *
 * ## Server errors
 *
 * - `Internal` - hashing, token signing, anything unexpected
 * - `Store` - persistence failures (mapped per store error)
 *
 * Server errors never leak detail to the client; the detail is logged when
 * the error is turned into a response.
 */

use axum::http::StatusCode;
use thiserror::Error;

use crate::backend::store::StoreError;
use crate::shared::SharedError;

/// Message sent to clients for every 500.
pub const GENERIC_SERVER_MESSAGE: &str = "Server error";

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use stanza::backend::error::BackendError;
///
/// let err = BackendError::not_found("Poem not found");
/// assert_eq!(err.status_code().as_u16(), 404);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Bad input (400)
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message
        message: String,
    },

    /// Missing or invalid credential (401)
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        /// Human-readable error message
        message: String,
    },

    /// Authenticated, but not the owner of the target (401)
    ///
    /// Kept apart from `Unauthenticated` so callers and logs can tell the two
    /// cases apart; the status code is shared for API compatibility.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },

    /// Target does not exist (404)
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// Unexpected failure (500)
    #[error("Internal error: {message}")]
    Internal {
        /// Detail for the logs, never sent to the client
        message: String,
    },

    /// Field validation error from the shared module
    #[error(transparent)]
    Shared(#[from] SharedError),

    /// Persistence error
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BackendError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Create an ownership error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create an internal error from some context and its cause
    pub fn internal(context: &str, cause: impl std::fmt::Display) -> Self {
        Self::Internal {
            message: format!("{context}: {cause}"),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::Shared(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated { .. } | Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(err) => match err {
                StoreError::DuplicateEmail => StatusCode::BAD_REQUEST,
                StoreError::PoemNotFound(_) => StatusCode::NOT_FOUND,
                StoreError::MissingAuthor(_) | StoreError::Database(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Get the message sent to the client
    ///
    /// Server errors are collapsed into [`GENERIC_SERVER_MESSAGE`].
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message }
            | Self::Unauthenticated { message }
            | Self::Unauthorized { message }
            | Self::NotFound { message } => message.clone(),
            Self::Shared(err) => err.client_message(),
            Self::Store(StoreError::DuplicateEmail) => {
                "A user with this email already exists".to_string()
            }
            Self::Store(StoreError::PoemNotFound(_)) => "Poem not found".to_string(),
            Self::Internal { .. } | Self::Store(_) => GENERIC_SERVER_MESSAGE.to_string(),
        }
    }

    /// Whether this error is the server's fault
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}
