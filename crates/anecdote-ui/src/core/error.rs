//! Error types shared by the completion store, import flow, and config loader.
//!
//! # Design
//! - Keep messages constant; carry the context in fields.
//! - Backend errors are the exception: their message is shown to the user verbatim.

use thiserror::Error;

/// Error reported by the hosted auth/record backend.
///
/// The `Display` output is the backend message unmodified so it can be placed
/// straight into the status area.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    /// Backend error code when provided (for example `PGRST116`).
    pub code: Option<String>,
    /// Human-readable message as returned by the backend.
    pub message: String,
}

/// Code returned by the record API when a single-row select matched nothing.
pub const NO_ROWS_CODE: &str = "PGRST116";
/// Code returned by the record API when the bearer token has expired.
pub const JWT_EXPIRED_CODE: &str = "PGRST301";

impl BackendError {
    /// Build an error from a backend message without a code.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Build an error carrying a backend code.
    #[must_use]
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Whether this error means "no record exists yet" rather than a failure.
    #[must_use]
    pub fn is_no_rows(&self) -> bool {
        self.code.as_deref() == Some(NO_ROWS_CODE)
    }

    /// Whether the access token was rejected as expired or invalid, so a token refresh
    /// followed by one retry may succeed.
    #[must_use]
    pub fn is_expired_session(&self) -> bool {
        matches!(self.code.as_deref(), Some("401" | JWT_EXPIRED_CODE))
            || self.message.to_ascii_lowercase().contains("jwt expired")
    }
}

/// Result alias for completion store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised while persisting completion state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Remote record read or write failed.
    #[error("remote completion record failure")]
    Remote {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// Underlying backend error.
        source: BackendError,
    },
    /// Local storage write failed.
    #[error("local completion storage failure")]
    Local {
        /// Operation that triggered the failure.
        operation: &'static str,
        /// Storage key involved.
        key: &'static str,
        /// Storage layer detail.
        detail: String,
    },
    /// The map could not be serialized.
    #[error("completion map serialization failure")]
    Serialize {
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Failures raised while importing a completion snapshot.
#[derive(Debug, Error)]
pub enum ImportError {
    /// File contents were not valid JSON.
    #[error("import payload is not valid json")]
    Parse {
        /// Underlying JSON error.
        source: serde_json::Error,
    },
    /// JSON parsed but the top-level value is not an object.
    #[error("import payload is not a json object")]
    NotAnObject {
        /// JSON type name of the rejected value.
        found: &'static str,
    },
}

/// Failures raised while validating configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
        /// Offending value when available.
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_displays_message_verbatim() {
        let err = BackendError::with_code("400", "Invalid login credentials");
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert!(!err.is_no_rows());
    }

    #[test]
    fn no_rows_code_is_recognised() {
        let err = BackendError::with_code(NO_ROWS_CODE, "JSON object requested, multiple (or no) rows returned");
        assert!(err.is_no_rows());
        assert!(!BackendError::message("boom").is_no_rows());
    }

    #[test]
    fn only_rejected_tokens_ask_for_a_refresh() {
        assert!(BackendError::with_code("401", "Unauthorized").is_expired_session());
        assert!(BackendError::with_code(JWT_EXPIRED_CODE, "JWT expired").is_expired_session());
        assert!(BackendError::with_code("403", "JWT expired").is_expired_session());
        assert!(!BackendError::with_code(NO_ROWS_CODE, "no rows").is_expired_session());
        assert!(!BackendError::with_code("500", "internal error").is_expired_session());
        assert!(!BackendError::message("Failed to fetch").is_expired_session());
    }

    #[test]
    fn store_error_messages_are_constant() {
        let err = StoreError::Remote {
            operation: "select",
            source: BackendError::message("timeout"),
        };
        assert_eq!(err.to_string(), "remote completion record failure");
    }
}
