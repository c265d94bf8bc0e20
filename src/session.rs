//! Session gate: one signed, stateless token standing in for the
//! "authenticated" flag. Possession of a valid token is the whole session
//! state; logout just clears the cookie.

use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sid: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    fn new(ttl_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sid: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(ttl_hours)).timestamp(),
        }
    }
}

/// Issue a fresh session token after a successful password check.
pub fn issue_token(config: &AppConfig) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::new(config.session_ttl_hours);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.session_secret.as_bytes()),
    )
}

fn verify_token(token: &str, config: &AppConfig) -> bool {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.session_secret.as_bytes()),
        &Validation::default(),
    )
    .is_ok()
}

/// Set-Cookie value carrying the session token.
pub fn session_cookie(token: &str, ttl_hours: i64) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        ttl_hours * 3600
    )
}

/// Set-Cookie value that clears the session unconditionally.
pub fn clear_session_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        pair.trim()
            .strip_prefix(SESSION_COOKIE)?
            .strip_prefix('=')
            .map(str::to_string)
    })
}

/// The gate itself: pure precondition check, touches no stored data.
pub fn is_authenticated(headers: &HeaderMap, config: &AppConfig) -> bool {
    match token_from_headers(headers) {
        Some(token) => verify_token(&token, config),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageConfig;
    use std::path::PathBuf;

    fn test_config(secret: &str) -> AppConfig {
        AppConfig {
            password: "pw".into(),
            session_secret: secret.into(),
            session_ttl_hours: 1,
            storage: StorageConfig::File {
                path: PathBuf::from("unused.json"),
            },
        }
    }

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, cookie.parse().unwrap());
        headers
    }

    #[test]
    fn issued_token_authenticates() {
        let config = test_config("secret-a");
        let token = issue_token(&config).unwrap();
        let headers = headers_with_cookie(&format!("session={}", token));
        assert!(is_authenticated(&headers, &config));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = test_config("secret-a");
        let token = issue_token(&config).unwrap();
        let headers = headers_with_cookie(&format!("session={}", token));
        assert!(!is_authenticated(&headers, &test_config("secret-b")));
    }

    #[test]
    fn missing_or_garbage_cookie_is_rejected() {
        let config = test_config("secret-a");
        assert!(!is_authenticated(&HeaderMap::new(), &config));

        let headers = headers_with_cookie("session=not-a-token");
        assert!(!is_authenticated(&headers, &config));
    }

    #[test]
    fn session_cookie_is_found_among_other_cookies() {
        let config = test_config("secret-a");
        let token = issue_token(&config).unwrap();
        let headers =
            headers_with_cookie(&format!("theme=dark; session={}; lang=en", token));
        assert!(is_authenticated(&headers, &config));
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config("secret-a");
        let claims = Claims {
            sid: Uuid::new_v4(),
            iat: (Utc::now() - Duration::hours(3)).timestamp(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.session_secret.as_bytes()),
        )
        .unwrap();
        let headers = headers_with_cookie(&format!("session={}", token));
        assert!(!is_authenticated(&headers, &config));
    }
}
