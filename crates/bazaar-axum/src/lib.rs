//! Bazaar Axum Integration
//!
//! Axum middleware stages and extractors for resolving the caller's identity
//! from the `accessToken` cookie.
//!
//! # Overview
//!
//! - **Stage A** [`authenticate`]: verifies the access token, loads the user
//!   and attaches a [`CurrentUser`] to the request extensions (401 otherwise)
//! - **Stage B** [`require_admin`]: lets only admins through (403 otherwise)
//! - **Extractors**: [`RequireAuth`] and [`RequireAdmin`] read what Stage A
//!   attached
//! - **Cookies**: [`cookies`] reads and writes the token cookies
//!
//! # Quick Start
//!
//! ```ignore
//! use axum::{middleware, routing::get, Router};
//! use bazaar_axum::{authenticate, require_admin, RequireAuth};
//!
//! async fn me(user: RequireAuth) -> String {
//!     format!("Hello, {}!", user.name)
//! }
//!
//! let admin = Router::new()
//!     .route("/admin", get(|| async { "ok" }))
//!     .route_layer(middleware::from_fn(require_admin));
//!
//! let app = Router::new()
//!     .route("/me", get(me))
//!     .merge(admin)
//!     .route_layer(middleware::from_fn_with_state(auth.clone(), authenticate::<Auth>));
//! ```
//!
//! Stage B is always layered inside Stage A; on its own it rejects with 403.

pub mod context;
pub mod cookies;
pub mod error;
pub mod extractors;
pub mod layer;

pub use context::CurrentUser;
pub use cookies::{read_cookie, CookiePolicy, ACCESS_COOKIE, REFRESH_COOKIE};
pub use error::AuthRejection;
pub use extractors::{RequireAdmin, RequireAuth};
pub use layer::{authenticate, authorize_admin, require_admin, IdentityResolver};
