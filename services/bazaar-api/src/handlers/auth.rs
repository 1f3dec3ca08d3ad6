//! Authentication handlers (signup, login, logout, refresh)

use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{AppendHeaders, IntoResponse};
use axum::routing::post;
use axum::{Json, Router};
use bazaar_auth_core::{AuthOutcome, Signup};
use bazaar_axum::{read_cookie, CookiePolicy, REFRESH_COOKIE};
use bazaar_db::{KeyValueCache, UserRepository};
use bazaar_types::{MessageResponse, PublicUser};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AuthState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: PublicUser,
    pub message: &'static str,
}

// ============================================================================
// Router
// ============================================================================

/// Routes mounted under `/api/auth`
pub fn auth_router<U, C, S>(state: AuthState<U, C>) -> Router<S>
where
    U: UserRepository + 'static,
    C: KeyValueCache + 'static,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/signup", post(signup::<U, C>))
        .route("/login", post(login::<U, C>))
        .route("/logout", post(logout::<U, C>))
        .route("/refresh-access-token", post(refresh_access_token::<U, C>))
        .with_state(state)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/signup
pub async fn signup<U, C>(
    State(state): State<AuthState<U, C>>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> ApiResult<impl IntoResponse>
where
    U: UserRepository + 'static,
    C: KeyValueCache + 'static,
{
    let outcome = state
        .auth
        .signup(Signup {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(session_response(&state.cookies, outcome, "User created successfully"))
}

/// POST /api/auth/login
pub async fn login<U, C>(
    State(state): State<AuthState<U, C>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse>
where
    U: UserRepository + 'static,
    C: KeyValueCache + 'static,
{
    let outcome = state.auth.login(&req.email, &req.password).await?;
    Ok(session_response(&state.cookies, outcome, "User logged in successfully"))
}

/// POST /api/auth/logout
///
/// Succeeds without a refresh cookie or with one that no longer decodes.
pub async fn logout<U, C>(
    State(state): State<AuthState<U, C>>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse>
where
    U: UserRepository + 'static,
    C: KeyValueCache + 'static,
{
    state
        .auth
        .logout(read_cookie(&headers, REFRESH_COOKIE))
        .await?;

    let [access, refresh] = state.cookies.cleared();
    Ok((
        AppendHeaders([(header::SET_COOKIE, access), (header::SET_COOKIE, refresh)]),
        Json(MessageResponse::new("User logged out successfully")),
    ))
}

/// POST /api/auth/refresh-access-token
///
/// Issues a new access token only; the refresh token is not rotated.
pub async fn refresh_access_token<U, C>(
    State(state): State<AuthState<U, C>>,
    headers: HeaderMap,
) -> ApiResult<impl IntoResponse>
where
    U: UserRepository + 'static,
    C: KeyValueCache + 'static,
{
    let access_token = state
        .auth
        .refresh_access_token(read_cookie(&headers, REFRESH_COOKIE))
        .await?;

    Ok((
        AppendHeaders([(header::SET_COOKIE, state.cookies.access(&access_token))]),
        Json(MessageResponse::new("Access token refreshed successfully")),
    ))
}

fn session_response(
    cookies: &CookiePolicy,
    outcome: AuthOutcome,
    message: &'static str,
) -> impl IntoResponse {
    let [access, refresh] = cookies.pair(&outcome.tokens);
    (
        AppendHeaders([(header::SET_COOKIE, access), (header::SET_COOKIE, refresh)]),
        Json(UserResponse {
            user: outcome.user,
            message,
        }),
    )
}
