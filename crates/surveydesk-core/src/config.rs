// ── Runtime connection configuration ──
//
// Describes *how* to reach the surveydesk backend. Carries the session
// token and transport tuning but never touches disk: the CLI builds a
// `DashboardConfig` from its profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::debounce::Debouncer;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. Only for local development backends.
    DangerAcceptInvalid,
}

/// Configuration for one dashboard session against one backend.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// API base URL (e.g., `https://api.example.com/api`).
    pub base_url: Url,
    /// Bearer token, the value of the `accessToken` cookie.
    pub access_token: Option<SecretString>,
    /// Whether the backend is a production deployment (controls `Secure`
    /// on the session cookie).
    pub production: bool,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Quiet period before a list-view filter edit is committed.
    pub debounce: Duration,
}

impl DashboardConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            access_token: None,
            production: false,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            debounce: Debouncer::DEFAULT_DELAY,
        }
    }

    #[must_use]
    pub fn with_access_token(mut self, token: SecretString) -> Self {
        self.access_token = Some(token);
        self
    }
}
