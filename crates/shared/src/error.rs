//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// The display string is what clients see in the `error` field of a JSON
/// error body, so variants carry user-facing messages verbatim.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad input: wrong extension, oversized file, missing identifier.
    #[error("{0}")]
    Validation(String),

    /// No valid session.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but lacking the required role.
    #[error("{0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// State transition not allowed (e.g. replying twice).
    #[error("{0}")]
    Conflict(String),

    /// Object storage failure.
    #[error("{0}")]
    Storage(String),

    /// Record store failure.
    #[error("{0}")]
    Database(String),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Storage(_) | Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code used in logs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this error is the server's fault.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}
