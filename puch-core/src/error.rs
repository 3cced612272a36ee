//! Error types for Puch tools.
//!
//! The core utilities (cache, geo resolver, script detector) never fail; a
//! miss is `None`. These errors belong to the adapters and the API layer.

use thiserror::Error;

/// Result type alias using `PuchError`.
pub type Result<T> = std::result::Result<T, PuchError>;

/// Main error type for adapter and server operations.
#[derive(Debug, Error)]
pub enum PuchError {
    // ═══════════════════════════════════════════════════════════════════════════
    // INPUT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Tool arguments failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Required configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Third-party credentials are not configured.
    #[error("{service} credentials missing. Set {variables} in .env.")]
    MissingCredentials {
        /// Service that needs the credentials.
        service: String,
        /// Environment variables that must be set.
        variables: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP transport failed before a response was read.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Upstream service answered with an error or unusable payload.
    #[error("{service} error: {reason}")]
    Upstream {
        /// Upstream service name.
        service: String,
        /// What went wrong.
        reason: String,
    },

    /// Upstream call timed out.
    #[error("Request to {0} timed out")]
    Timeout(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // DATA ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Upstream document could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Internal invariant violation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PuchError {
    /// Creates an upstream error for the named service.
    pub fn upstream(service: impl Into<String>, reason: impl Into<String>) -> Self {
        PuchError::Upstream {
            service: service.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error is recoverable (can retry).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PuchError::Http(_) | PuchError::Timeout(_) | PuchError::Upstream { .. }
        )
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, PuchError::Validation(_))
    }

    /// Returns true if the server is missing configuration to satisfy the call.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            PuchError::Config(_) | PuchError::MissingCredentials { .. }
        )
    }
}
