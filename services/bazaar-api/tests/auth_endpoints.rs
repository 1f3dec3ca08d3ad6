//! HTTP-level tests for the auth endpoints
//!
//! Drives the auth router over in-memory storage and checks status codes,
//! error envelopes and the `Set-Cookie` headers each endpoint emits.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use bazaar_api::handlers::auth_router;
use bazaar_api::state::AuthState;
use bazaar_auth_core::{refresh_key, AuthService};
use bazaar_types::UserId;
use common::{test_config, MockCache, MockUserRepository};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    users: MockUserRepository,
    cache: MockCache,
}

impl TestApp {
    fn new() -> Self {
        let users = MockUserRepository::new();
        let cache = MockCache::new();
        let auth = AuthService::new(
            test_config(),
            Arc::new(users.clone()),
            Arc::new(cache.clone()),
        );
        let router = Router::new().nest("/api/auth", auth_router(AuthState::new(Arc::new(auth))));
        Self {
            router,
            users,
            cache,
        }
    }

    async fn post_json(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn post_with_cookie(&self, path: &str, cookie: Option<&str>) -> TestResponse {
        let mut builder = Request::post(path);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            content_type,
            cookies,
            body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        }
    }
}

struct TestResponse {
    status: StatusCode,
    content_type: String,
    cookies: Vec<String>,
    body: Value,
}

impl TestResponse {
    fn cookie(&self, name: &str) -> Option<&str> {
        let prefix = format!("{name}=");
        self.cookies
            .iter()
            .find(|c| c.starts_with(&prefix))
            .map(String::as_str)
    }

    /// Value of a `Set-Cookie` header, without attributes
    fn cookie_value(&self, name: &str) -> Option<&str> {
        self.cookie(name)
            .and_then(|c| c.split(';').next())
            .and_then(|pair| pair.split_once('='))
            .map(|(_, value)| value)
    }

    fn error_code(&self) -> &str {
        self.body["error"]["code"].as_str().unwrap_or_default()
    }
}

const SIGNUP: &str = r#"{"name":"Ada Lovelace","email":"ada@example.com","password":"analytical"}"#;

// ============================================================================
// Signup
// ============================================================================

#[tokio::test]
async fn test_signup_sets_both_cookies() {
    let app = TestApp::new();
    let response = app.post_json("/api/auth/signup", SIGNUP).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.cookies.len(), 2);

    let access = response.cookie("accessToken").expect("access cookie");
    assert!(access.contains("HttpOnly"));
    assert!(access.contains("SameSite=Strict"));
    assert!(access.contains("Max-Age=900"));
    assert!(!access.contains("Secure"));

    let refresh = response.cookie("refreshToken").expect("refresh cookie");
    assert!(refresh.contains("HttpOnly"));
    assert!(refresh.contains("Max-Age=604800"));

    assert_eq!(response.body["message"], "User created successfully");
    assert_eq!(response.body["user"]["email"], "ada@example.com");
    assert_eq!(response.body["user"]["role"], "customer");
    assert!(response.body["user"].get("password").is_none());
    assert!(response.body["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_signup_stores_the_issued_refresh_token() {
    let app = TestApp::new();
    let response = app.post_json("/api/auth/signup", SIGNUP).await;

    let stored = app.users.get_by_email("ada@example.com").expect("user stored");
    let key = refresh_key(&UserId(stored.id));
    assert_eq!(
        app.cache.raw(&key).as_deref(),
        response.cookie_value("refreshToken")
    );
}

#[tokio::test]
async fn test_duplicate_signup_is_400_envelope() {
    let app = TestApp::new();
    app.post_json("/api/auth/signup", SIGNUP).await;
    let response = app.post_json("/api/auth/signup", SIGNUP).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "USER_EXISTS");
    assert_eq!(response.body["error"]["message"], "User already exists");
    assert!(response.cookies.is_empty());
    assert_eq!(app.users.len(), 1);
}

#[tokio::test]
async fn test_incomplete_body_is_400_envelope() {
    let app = TestApp::new();
    let response = app
        .post_json("/api/auth/signup", r#"{"name":"a","email":"a@b.c"}"#)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.content_type.starts_with("application/json"));
    assert_eq!(response.error_code(), "BAD_REQUEST");
    assert!(response.body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("password"));
    assert_eq!(app.users.len(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_400_envelope() {
    let app = TestApp::new();
    let response = app.post_json("/api/auth/login", "{not json").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), "BAD_REQUEST");
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_sets_both_cookies() {
    let app = TestApp::new();
    app.post_json("/api/auth/signup", SIGNUP).await;

    let response = app
        .post_json(
            "/api/auth/login",
            r#"{"email":"ada@example.com","password":"analytical"}"#,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "User logged in successfully");
    assert!(response.cookie("accessToken").unwrap().contains("Max-Age=900"));
    assert!(response
        .cookie("refreshToken")
        .unwrap()
        .contains("Max-Age=604800"));
}

#[tokio::test]
async fn test_login_rejections_share_one_envelope() {
    let app = TestApp::new();
    app.post_json("/api/auth/signup", SIGNUP).await;

    let wrong_password = app
        .post_json(
            "/api/auth/login",
            &json!({"email": "ada@example.com", "password": "babbage"}).to_string(),
        )
        .await;
    let unknown_email = app
        .post_json(
            "/api/auth/login",
            &json!({"email": "nobody@example.com", "password": "analytical"}).to_string(),
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.status, unknown_email.status);
    assert_eq!(wrong_password.body, unknown_email.body);
    assert_eq!(wrong_password.error_code(), "INVALID_CREDENTIALS");
    assert!(wrong_password.cookies.is_empty());
}

// ============================================================================
// Logout
// ============================================================================

#[tokio::test]
async fn test_logout_without_cookies_clears_both() {
    let app = TestApp::new();
    let response = app.post_with_cookie("/api/auth/logout", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "User logged out successfully");
    assert_eq!(response.cookies.len(), 2);
    for name in ["accessToken", "refreshToken"] {
        let cookie = response.cookie(name).expect("clearing cookie");
        assert!(cookie.starts_with(&format!("{name}=;")));
        assert!(cookie.contains("Max-Age=0"));
    }
}

#[tokio::test]
async fn test_logout_with_garbage_cookie_succeeds() {
    let app = TestApp::new();
    let response = app
        .post_with_cookie("/api/auth/logout", Some("refreshToken=not-a-jwt"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.cookies.len(), 2);
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app = TestApp::new();
    let signup = app.post_json("/api/auth/signup", SIGNUP).await;
    let refresh = signup.cookie_value("refreshToken").unwrap().to_string();
    let cookie = format!("refreshToken={refresh}");

    let response = app
        .post_with_cookie("/api/auth/logout", Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let stored = app.users.get_by_email("ada@example.com").unwrap();
    assert!(app.cache.raw(&refresh_key(&UserId(stored.id))).is_none());

    let response = app
        .post_with_cookie("/api/auth/refresh-access-token", Some(&cookie))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "SESSION_REVOKED");
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_sets_only_access_cookie() {
    let app = TestApp::new();
    let signup = app.post_json("/api/auth/signup", SIGNUP).await;
    let cookie = format!(
        "refreshToken={}",
        signup.cookie_value("refreshToken").unwrap()
    );

    let response = app
        .post_with_cookie("/api/auth/refresh-access-token", Some(&cookie))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Access token refreshed successfully");
    assert_eq!(response.cookies.len(), 1);
    let access = response.cookie("accessToken").expect("access cookie");
    assert!(access.contains("Max-Age=900"));
    assert!(response.cookie("refreshToken").is_none());
}

#[tokio::test]
async fn test_refresh_without_cookie_is_401() {
    let app = TestApp::new();
    let response = app
        .post_with_cookie("/api/auth/refresh-access-token", None)
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "MISSING_TOKEN");
    assert!(response.cookies.is_empty());
}

#[tokio::test]
async fn test_refresh_with_superseded_token_is_401() {
    let app = TestApp::new();
    let signup = app.post_json("/api/auth/signup", SIGNUP).await;
    let stale = format!(
        "refreshToken={}",
        signup.cookie_value("refreshToken").unwrap()
    );

    app.post_json(
        "/api/auth/login",
        r#"{"email":"ada@example.com","password":"analytical"}"#,
    )
    .await;

    let response = app
        .post_with_cookie("/api/auth/refresh-access-token", Some(&stale))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), "SESSION_REVOKED");
}
