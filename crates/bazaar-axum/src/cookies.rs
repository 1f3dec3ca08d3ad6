//! Token cookie transport.
//!
//! Both tokens travel as `HttpOnly; SameSite=Strict` cookies scoped to `/`,
//! with `Secure` added in production.

use std::time::Duration;

use axum::http::{header, HeaderMap};
use bazaar_auth_core::{AuthConfig, TokenPair};

/// Cookie carrying the access token
pub const ACCESS_COOKIE: &str = "accessToken";

/// Cookie carrying the refresh token
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Read a cookie value from every `Cookie` header on the request.
///
/// Empty values count as absent.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Attributes and lifetimes for the token cookies
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    /// Add the `Secure` attribute
    pub secure: bool,
    /// `Max-Age` of the access cookie
    pub access_max_age: Duration,
    /// `Max-Age` of the refresh cookie
    pub refresh_max_age: Duration,
}

impl CookiePolicy {
    /// Cookie lifetimes follow the token lifetimes
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            secure: config.secure_cookies,
            access_max_age: config.access_ttl,
            refresh_max_age: config.refresh_ttl,
        }
    }

    /// `Set-Cookie` value for the access cookie
    pub fn access(&self, token: &str) -> String {
        self.build(ACCESS_COOKIE, token, self.access_max_age.as_secs())
    }

    /// `Set-Cookie` value for the refresh cookie
    pub fn refresh(&self, token: &str) -> String {
        self.build(REFRESH_COOKIE, token, self.refresh_max_age.as_secs())
    }

    /// `Set-Cookie` values for both tokens
    pub fn pair(&self, tokens: &TokenPair) -> [String; 2] {
        [
            self.access(&tokens.access_token),
            self.refresh(&tokens.refresh_token),
        ]
    }

    /// `Set-Cookie` values that remove both cookies
    pub fn cleared(&self) -> [String; 2] {
        [
            self.build(ACCESS_COOKIE, "", 0),
            self.build(REFRESH_COOKIE, "", 0),
        ]
    }

    fn build(&self, name: &str, value: &str, max_age: u64) -> String {
        let mut cookie =
            format!("{name}={value}; HttpOnly; SameSite=Strict; Path=/; Max-Age={max_age}");
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn policy(secure: bool) -> CookiePolicy {
        CookiePolicy {
            secure,
            access_max_age: Duration::from_secs(900),
            refresh_max_age: Duration::from_secs(604_800),
        }
    }

    #[test]
    fn test_read_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; accessToken=abc.def.ghi; refreshToken="),
        );

        assert_eq!(read_cookie(&headers, ACCESS_COOKIE), Some("abc.def.ghi"));
        assert_eq!(read_cookie(&headers, REFRESH_COOKIE), None);
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_read_cookie_across_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("refreshToken=xyz"));

        assert_eq!(read_cookie(&headers, REFRESH_COOKIE), Some("xyz"));
    }

    #[test]
    fn test_set_cookie_attributes() {
        let cookie = policy(false).access("tok");
        assert_eq!(
            cookie,
            "accessToken=tok; HttpOnly; SameSite=Strict; Path=/; Max-Age=900"
        );

        let cookie = policy(true).refresh("tok");
        assert!(cookie.starts_with("refreshToken=tok;"));
        assert!(cookie.contains("Max-Age=604800"));
        assert!(cookie.ends_with("; Secure"));
    }

    #[test]
    fn test_cleared_cookies() {
        for cookie in policy(true).cleared() {
            assert!(cookie.contains("=; "));
            assert!(cookie.contains("Max-Age=0"));
            assert!(cookie.contains("HttpOnly"));
        }
    }
}
