//! Cookie header helpers for the session and API-key cookies.

use std::time::Duration;

use axum::http::{header, HeaderMap};

pub const SESSION_COOKIE: &str = "proposal_session";
pub const API_KEY_COOKIE: &str = "proposal_api_key";

/// Returns the value of cookie `name` from the request's `Cookie` headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

/// Builds a `Set-Cookie` value for an HttpOnly, SameSite=Strict cookie.
pub fn set_cookie(name: &str, value: &str, max_age: Duration, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{name}={value}; Path=/; HttpOnly; SameSite=Strict; Max-Age={}{secure}",
        max_age.as_secs()
    )
}

/// Builds a `Set-Cookie` value that expires cookie `name` immediately.
pub fn clear_cookie(name: &str, secure: bool) -> String {
    set_cookie(name, "", Duration::ZERO, secure)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_read_cookie_finds_named_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; proposal_session=abc.def.ghi; other=1"),
        );
        assert_eq!(read_cookie(&headers, SESSION_COOKIE), Some("abc.def.ghi"));
        assert_eq!(read_cookie(&headers, "theme"), Some("dark"));
        assert_eq!(read_cookie(&headers, API_KEY_COOKIE), None);
    }

    #[test]
    fn test_read_cookie_across_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(header::COOKIE, HeaderValue::from_static("proposal_api_key=xyz"));
        assert_eq!(read_cookie(&headers, API_KEY_COOKIE), Some("xyz"));
    }

    #[test]
    fn test_empty_cookie_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("proposal_session="));
        assert_eq!(read_cookie(&headers, SESSION_COOKIE), None);
    }

    #[test]
    fn test_set_cookie_attributes() {
        let cookie = set_cookie(SESSION_COOKIE, "tok", Duration::from_secs(60), true);
        assert_eq!(
            cookie,
            "proposal_session=tok; Path=/; HttpOnly; SameSite=Strict; Max-Age=60; Secure"
        );
        let insecure = set_cookie(SESSION_COOKIE, "tok", Duration::from_secs(60), false);
        assert!(!insecure.contains("Secure"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_cookie(API_KEY_COOKIE, false);
        assert!(cookie.starts_with("proposal_api_key=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
