//! Storage errors

use thiserror::Error;

/// Postgres error code for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// Storage errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(sqlx::Error),

    /// A unique constraint rejected the write
    #[error("duplicate value violates unique constraint: {0}")]
    Conflict(String),

    /// Redis error
    #[error("cache error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Stored JSON could not be (de)serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Record not found
    #[error("record not found")]
    NotFound,
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        let constraint = err.as_database_error().and_then(|db| {
            (db.code().as_deref() == Some(UNIQUE_VIOLATION))
                .then(|| db.constraint().unwrap_or("unique").to_string())
        });
        match constraint {
            Some(name) => Self::Conflict(name),
            None => Self::Sqlx(err),
        }
    }
}

/// Result alias for storage operations
pub type DbResult<T> = Result<T, DbError>;
