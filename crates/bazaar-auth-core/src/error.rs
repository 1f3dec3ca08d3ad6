//! Auth errors

use bazaar_db::DbError;
use thiserror::Error;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// No token presented
    #[error("Unauthorized - no token provided")]
    MissingToken,

    /// Invalid token (malformed, bad signature, wrong secret)
    #[error("Unauthorized - invalid token")]
    InvalidToken,

    /// Token has expired
    #[error("Unauthorized - token expired")]
    TokenExpired,

    /// Refresh token is valid but no longer the stored one
    #[error("Unauthorized - refresh token is no longer active")]
    SessionRevoked,

    /// Token refers to a user that no longer exists
    #[error("Unauthorized - user not found")]
    UserNotFound,

    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Signup with an email already in use
    #[error("User already exists")]
    EmailTaken,

    /// Malformed signup input
    #[error("{0}")]
    Validation(String),

    /// Authenticated but not an admin
    #[error("Access denied: admin only")]
    Forbidden,

    /// Database error, carrying the storage error text
    #[error("{0}")]
    Database(String),

    /// Session cache error
    #[error("cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingToken
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::SessionRevoked
            | Self::UserNotFound
            | Self::InvalidCredentials => 401,
            Self::EmailTaken | Self::Validation(_) => 400,
            Self::Forbidden => 403,
            Self::Database(_) | Self::Cache(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingToken => "MISSING_TOKEN",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::SessionRevoked => "SESSION_REVOKED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::EmailTaken => "USER_EXISTS",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Forbidden => "FORBIDDEN",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether this is an unauthenticated rejection
    pub fn is_unauthenticated(&self) -> bool {
        self.status_code() == 401
    }
}

impl From<DbError> for AuthError {
    fn from(err: DbError) -> Self {
        tracing::error!(error = %err, "Storage error");
        match err {
            DbError::Redis(e) => Self::Cache(e.to_string()),
            other => Self::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_table() {
        assert_eq!(AuthError::MissingToken.status_code(), 401);
        assert_eq!(AuthError::UserNotFound.status_code(), 401);
        assert_eq!(AuthError::EmailTaken.status_code(), 400);
        assert_eq!(AuthError::Forbidden.status_code(), 403);
        assert_eq!(AuthError::Cache("down".into()).status_code(), 500);
    }

    #[test]
    fn test_db_error_conversion() {
        let err: AuthError = DbError::Conflict("users_email_key".to_string()).into();
        assert!(matches!(err, AuthError::Database(_)));
        assert!(!err.is_unauthenticated());

        let message = err.to_string();
        assert!(message.contains("users_email_key"));
        assert_eq!(message.matches("duplicate value").count(), 1);
    }

    #[test]
    fn test_db_error_message_not_prefixed_twice() {
        let err: AuthError = DbError::NotFound.into();
        assert_eq!(err.to_string(), "record not found");
    }
}
