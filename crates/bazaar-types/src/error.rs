//! Common error types

use thiserror::Error;

/// Errors raised while parsing shared domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// Unknown role name
    #[error("invalid role: {0}")]
    InvalidRole(String),

    /// Malformed identifier
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
