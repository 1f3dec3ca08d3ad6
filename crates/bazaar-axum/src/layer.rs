//! Identity resolution as axum middleware stages.
//!
//! [`authenticate`] (Stage A) and [`require_admin`] (Stage B) are plain
//! `from_fn` middleware so they compose per route group with `route_layer`.
//! Each stage either short-circuits with an [`AuthRejection`] or hands the
//! request on unchanged apart from the attached [`CurrentUser`].

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use bazaar_auth_core::{AuthError, AuthService};
use bazaar_db::{KeyValueCache, UserRepository};
use bazaar_types::PublicUser;

use crate::context::CurrentUser;
use crate::cookies::{read_cookie, ACCESS_COOKIE};
use crate::error::AuthRejection;

/// Turns an access token into the user it belongs to.
#[async_trait]
pub trait IdentityResolver: Send + Sync + 'static {
    /// Resolve `access_token`, rejecting missing, invalid or expired tokens
    /// and tokens for users that no longer exist.
    async fn resolve(&self, access_token: Option<&str>) -> Result<PublicUser, AuthError>;
}

#[async_trait]
impl<U, C> IdentityResolver for AuthService<U, C>
where
    U: UserRepository + 'static,
    C: KeyValueCache + 'static,
{
    async fn resolve(&self, access_token: Option<&str>) -> Result<PublicUser, AuthError> {
        self.resolve_identity(access_token).await
    }
}

/// Stage A: authenticate the caller from the `accessToken` cookie.
pub async fn authenticate<R: IdentityResolver>(
    State(resolver): State<Arc<R>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    let token = read_cookie(req.headers(), ACCESS_COOKIE).map(str::to_owned);
    let user = resolver.resolve(token.as_deref()).await?;

    tracing::debug!(user_id = %user.id, role = %user.role, "Authenticated request");
    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Stage B: admit only admins. Must run after [`authenticate`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AuthRejection> {
    authorize_admin(req.extensions().get::<CurrentUser>())?;
    Ok(next.run(req).await)
}

/// Admin check shared by [`require_admin`] and
/// [`RequireAdmin`](crate::RequireAdmin). A missing identity is forbidden.
pub fn authorize_admin(user: Option<&CurrentUser>) -> Result<(), AuthRejection> {
    match user {
        Some(user) if user.is_admin() => Ok(()),
        Some(user) => {
            tracing::debug!(user_id = %user.id, "Admin route denied");
            Err(AuthRejection::forbidden())
        }
        None => {
            tracing::warn!("Admin gate reached without an authenticated identity");
            Err(AuthRejection::forbidden())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_types::{Role, UserId};

    fn user(role: Role) -> CurrentUser {
        CurrentUser(PublicUser {
            id: UserId::new(),
            name: "Test".to_string(),
            email: "test@example.com".to_string(),
            role,
            cart_items: Vec::new(),
        })
    }

    #[test]
    fn test_authorize_admin() {
        assert!(authorize_admin(Some(&user(Role::Admin))).is_ok());
        assert!(matches!(
            authorize_admin(Some(&user(Role::Customer))),
            Err(AuthRejection(AuthError::Forbidden))
        ));
        assert!(matches!(
            authorize_admin(None),
            Err(AuthRejection(AuthError::Forbidden))
        ));
    }
}
