//! Signed session cookie.
//!
//! The cookie value is `<token>.<signature>` where the signature is
//! HMAC-SHA256 over the token, base64url without padding. A client that
//! alters the token cannot produce a matching signature.

use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::service::{AuthError, SessionConfig};

type HmacSha256 = Hmac<Sha256>;

/// Minimum accepted signing key length, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

pub struct CookieSigner {
    key: Vec<u8>,
}

impl CookieSigner {
    pub fn new(secret: &[u8]) -> Result<Self, AuthError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::Internal(format!(
                "session secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }
        Ok(Self {
            key: secret.to_vec(),
        })
    }

    fn mac(&self) -> Result<HmacSha256, AuthError> {
        HmacSha256::new_from_slice(&self.key)
            .map_err(|e| AuthError::Internal(format!("hmac key: {}", e)))
    }

    /// Produce the cookie value for a session token.
    pub fn sign(&self, token: &str) -> Result<String, AuthError> {
        let mut mac = self.mac()?;
        mac.update(token.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{}.{}", token, signature))
    }

    /// Return the token if the cookie value carries a valid signature.
    ///
    /// The comparison is constant-time.
    pub fn verify<'a>(&self, value: &'a str) -> Option<&'a str> {
        let (token, signature) = value.rsplit_once('.')?;
        if token.is_empty() {
            return None;
        }
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        let mut mac = self.mac().ok()?;
        mac.update(token.as_bytes());
        mac.verify_slice(&signature).ok()?;
        Some(token)
    }
}

/// Find a cookie by name across all `Cookie` headers.
pub fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.trim_matches('"'))
}

/// `Set-Cookie` value that installs the session cookie.
pub fn session_cookie(config: &SessionConfig, value: &str) -> String {
    build_cookie(config, value, config.ttl_secs)
}

/// `Set-Cookie` value that removes the session cookie from the browser.
pub fn removal_cookie(config: &SessionConfig) -> String {
    build_cookie(config, "", 0)
}

fn build_cookie(config: &SessionConfig, value: &str, max_age: u64) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        config.cookie_name, value, max_age
    );
    if config.secure {
        cookie.push_str("; Secure");
    }
    cookie
}
