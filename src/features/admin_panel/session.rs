//! Signed admin session tokens carried in an HttpOnly cookie.

use std::time::Duration;

use axum::http::{header, HeaderMap, HeaderValue};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::core::config::SessionConfig;
use crate::core::error::{AppError, Result};

const SESSION_ISSUER: &str = "confectionery-catalog-admin";

/// Cookie is only sent to the admin panel
const COOKIE_PATH: &str = "/admin";

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Admin id
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    cookie_name: String,
    ttl: Duration,
    secure: bool,
}

impl SessionManager {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            cookie_name: config.cookie_name.clone(),
            ttl: config.ttl,
            secure: config.secure_cookie,
        }
    }

    /// Sign a session token for `admin_id`
    pub fn issue(&self, admin_id: i32) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: admin_id.to_string(),
            iss: SESSION_ISSUER.to_string(),
            iat: now,
            exp: now + self.ttl.as_secs() as i64,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign admin session: {:?}", e);
            AppError::Internal("Failed to create session".to_string())
        })
    }

    /// Validate signature, issuer and expiry; returns the admin id
    pub fn verify(&self, token: &str) -> Result<i32> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[SESSION_ISSUER]);

        let data = decode::<SessionClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Rejected admin session token: {}", e);
            invalid_session()
        })?;

        data.claims.sub.parse::<i32>().map_err(|_| invalid_session())
    }

    /// `Set-Cookie` value carrying `token`
    pub fn session_cookie(&self, token: &str) -> Result<HeaderValue> {
        self.cookie(token, self.ttl.as_secs())
    }

    /// `Set-Cookie` value that removes the session cookie
    pub fn clear_cookie(&self) -> Result<HeaderValue> {
        self.cookie("", 0)
    }

    fn cookie(&self, value: &str, max_age: u64) -> Result<HeaderValue> {
        let mut cookie = format!(
            "{}={}; Path={}; HttpOnly; SameSite=Lax; Max-Age={}",
            self.cookie_name, value, COOKIE_PATH, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie)
            .map_err(|e| AppError::Internal(format!("Invalid session cookie: {}", e)))
    }

    /// Session token from the request's `Cookie` headers, if any
    pub fn token_from_headers(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == self.cookie_name && !value.is_empty()).then(|| value.to_string())
            })
            .next()
    }
}

fn invalid_session() -> AppError {
    AppError::Unauthorized("Invalid or expired admin session".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, secure: bool) -> SessionConfig {
        SessionConfig {
            secret: secret.to_string(),
            cookie_name: "admin_session".to_string(),
            ttl: Duration::from_secs(86400),
            secure_cookie: secure,
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let sessions = SessionManager::new(&config("test-secret", false));
        let token = sessions.issue(42).unwrap();
        assert_eq!(sessions.verify(&token).unwrap(), 42);
    }

    #[test]
    fn test_rejects_foreign_or_tampered_tokens() {
        let sessions = SessionManager::new(&config("test-secret", false));
        let other = SessionManager::new(&config("another-secret", false));
        let token = other.issue(1).unwrap();
        assert!(matches!(
            sessions.verify(&token),
            Err(AppError::Unauthorized(_))
        ));
        assert!(sessions.verify("not.a.token").is_err());
    }

    #[test]
    fn test_rejects_expired_tokens() {
        let sessions = SessionManager::new(&config("test-secret", false));
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "1".to_string(),
            iss: SESSION_ISSUER.to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &sessions.encoding_key).unwrap();
        assert!(sessions.verify(&token).is_err());
    }

    #[test]
    fn test_rejects_wrong_issuer() {
        let sessions = SessionManager::new(&config("test-secret", false));
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: "1".to_string(),
            iss: "someone-else".to_string(),
            iat: now,
            exp: now + 3600,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &sessions.encoding_key).unwrap();
        assert!(sessions.verify(&token).is_err());
    }

    #[test]
    fn test_cookie_attributes() {
        let sessions = SessionManager::new(&config("s", false));
        let cookie = sessions.session_cookie("abc").unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            "admin_session=abc; Path=/admin; HttpOnly; SameSite=Lax; Max-Age=86400"
        );

        let secure = SessionManager::new(&config("s", true));
        assert!(secure
            .clear_cookie()
            .unwrap()
            .to_str()
            .unwrap()
            .ends_with("Max-Age=0; Secure"));
    }

    #[test]
    fn test_token_from_headers() {
        let sessions = SessionManager::new(&config("s", false));
        let mut headers = HeaderMap::new();
        assert_eq!(sessions.token_from_headers(&headers), None);

        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; admin_session=tok123; lang=en"),
        );
        assert_eq!(sessions.token_from_headers(&headers), Some("tok123".to_string()));

        headers.insert(header::COOKIE, HeaderValue::from_static("admin_session="));
        assert_eq!(sessions.token_from_headers(&headers), None);
    }
}
