// Session token handling
//
// The backend authenticates with a bearer token that the browser-facing
// side keeps in the `accessToken` cookie. `Session` is the in-process
// holder the client reads on every request; persisting a rotated token is
// the caller's job.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::Error;

/// Cookie name carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";

/// Default cookie lifetime (7 days).
const DEFAULT_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 60 * 60);

// ── Session ─────────────────────────────────────────────────────────

/// Request-scoped credential holder.
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<SecretString>>,
}

impl Session {
    pub fn new(token: Option<SecretString>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    // Writes replace the whole token, so a poisoned lock still holds a
    // usable value.
    fn read(&self) -> RwLockReadGuard<'_, Option<SecretString>> {
        self.token.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<SecretString>> {
        self.token.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn token(&self) -> Option<SecretString> {
        self.read().clone()
    }

    /// Swap in a rotated token so later requests use it.
    pub fn replace(&self, token: SecretString) {
        debug!("session token replaced");
        *self.write() = Some(token);
    }

    pub fn clear(&self) {
        *self.write() = None;
    }

    /// `Authorization: Bearer <token>` value, marked sensitive so it never
    /// shows up in debug output.
    pub fn authorization_header(&self) -> Result<Option<HeaderValue>, Error> {
        let guard = self.read();
        let Some(token) = guard.as_ref() else {
            return Ok(None);
        };
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::InvalidHeader(format!("invalid bearer token: {e}")))?;
        value.set_sensitive(true);
        Ok(Some(value))
    }
}

// ── SessionCookie ───────────────────────────────────────────────────

/// The `accessToken` cookie as written after login or a profile update.
///
/// Readable by page scripts (never `HttpOnly`), `SameSite=Lax`, and
/// `Secure` only in production.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    token: SecretString,
    secure: bool,
    max_age: Duration,
}

impl SessionCookie {
    pub fn new(token: SecretString, production: bool) -> Self {
        Self {
            token,
            secure: production,
            max_age: DEFAULT_MAX_AGE,
        }
    }

    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// Render as a `Set-Cookie` header value.
    pub fn to_set_cookie(&self) -> String {
        let mut cookie = format!(
            "{ACCESS_TOKEN_COOKIE}={}; Path=/; Max-Age={}; SameSite=Lax",
            self.token.expose_secret(),
            self.max_age.as_secs()
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Extract the access token from a request `Cookie` header.
    pub fn from_cookie_header(header: &str) -> Option<SecretString> {
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == ACCESS_TOKEN_COOKIE)
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
            .map(|value| SecretString::from(value.to_owned()))
    }
}
