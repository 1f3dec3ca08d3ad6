//! Bazaar Auth Core - Authentication business logic
//!
//! Token issuance with separate access/refresh secrets, the single
//! refresh-token-per-user session registry, password hashing, and the
//! signup/login/logout/refresh orchestration built on top of them.

pub mod config;
pub mod crypto;
pub mod error;
pub mod service;
pub mod session;
pub mod token;

pub use config::AuthConfig;
pub use crypto::{constant_time_eq, hash_password, verify_password};
pub use error::AuthError;
pub use service::{AuthOutcome, AuthService, Signup};
pub use session::{refresh_key, SessionRegistry};
pub use token::{TokenClaims, TokenIssuer, TokenKind, TokenPair};
