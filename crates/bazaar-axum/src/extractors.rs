//! Axum extractors for authentication and authorization.
//!
//! These read the [`CurrentUser`] attached by the
//! [`authenticate`](crate::authenticate) stage; they never touch cookies.
//!
//! # Usage
//!
//! ```ignore
//! use bazaar_axum::{RequireAdmin, RequireAuth};
//!
//! // 401 if Stage A did not run or did not attach an identity
//! async fn cart(user: RequireAuth) -> String {
//!     format!("{} items", user.cart_items.len())
//! }
//!
//! // 403 unless the caller is an admin
//! async fn admin_only(admin: RequireAdmin) -> &'static str {
//!     "Admin panel"
//! }
//! ```

use std::ops::Deref;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bazaar_auth_core::AuthError;
use bazaar_types::PublicUser;

use crate::context::CurrentUser;
use crate::error::AuthRejection;
use crate::layer::authorize_admin;

/// Extractor that requires an authenticated caller.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub PublicUser);

impl Deref for RequireAuth {
    type Target = PublicUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .map(|user| Self(user.into_inner()))
            .ok_or(AuthRejection(AuthError::MissingToken))
    }
}

/// Extractor that requires an admin caller.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub PublicUser);

impl Deref for RequireAdmin {
    type Target = PublicUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<CurrentUser>();
        authorize_admin(user)?;
        // authorize_admin only passes when an identity is present
        user.cloned()
            .map(|user| Self(user.into_inner()))
            .ok_or_else(AuthRejection::forbidden)
    }
}
