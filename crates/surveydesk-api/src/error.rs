use thiserror::Error;

/// Top-level error type for the `surveydesk-api` crate.
///
/// Covers client-side failures only: transport, URL construction, and
/// bodies that are not a response envelope. A well-formed
/// `{ success: false }` envelope is *not* an error -- it comes back as
/// [`ApiResponse::Failure`](crate::ApiResponse::Failure).
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// A header value (e.g. the bearer token) could not be encoded.
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    // ── Response ────────────────────────────────────────────────────
    /// Non-success HTTP status whose body is not a response envelope.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// Request body could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on the
    /// next user-triggered navigation.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Status { status: 404, .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the backend rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        let err = Error::Status {
            status: 404,
            body: String::new(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_transient());

        let err = Error::Status {
            status: 503,
            body: "unavailable".into(),
        };
        assert!(err.is_transient());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn deserialization_is_terminal() {
        let err = Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        };
        assert!(!err.is_transient());
        assert!(!err.is_not_found());
    }
}
