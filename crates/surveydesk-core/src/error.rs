// ── Core error types ──
//
// User-facing errors from surveydesk-core. Services themselves never
// return these: they log and degrade to `None`. `CoreError` surfaces at
// construction time and when a caller turns a `PageOutcome::NotFound`
// into a hard failure.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Backend request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            identifier: identifier.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<surveydesk_api::Error> for CoreError {
    fn from(err: surveydesk_api::Error) -> Self {
        match err {
            surveydesk_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            surveydesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid backend URL: {e}"),
            },
            surveydesk_api::Error::Tls(message) => CoreError::ConnectionFailed {
                url: "<tls>".into(),
                reason: message,
            },
            surveydesk_api::Error::InvalidHeader(message) => {
                CoreError::AuthenticationFailed { message }
            }
            surveydesk_api::Error::Status { status, body } => match status {
                401 | 403 => CoreError::AuthenticationFailed { message: body },
                404 => CoreError::not_found("resource", body),
                _ => CoreError::Api {
                    message: body,
                    status: Some(status),
                },
            },
            surveydesk_api::Error::Deserialization { message, .. } => CoreError::Api {
                message: format!("unexpected response body: {message}"),
                status: None,
            },
            surveydesk_api::Error::Serialization(e) => CoreError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_map_by_code() {
        let auth = CoreError::from(surveydesk_api::Error::Status {
            status: 401,
            body: "expired".into(),
        });
        assert!(matches!(auth, CoreError::AuthenticationFailed { .. }));

        let missing = CoreError::from(surveydesk_api::Error::Status {
            status: 404,
            body: "gone".into(),
        });
        assert!(matches!(missing, CoreError::NotFound { .. }));

        let server = CoreError::from(surveydesk_api::Error::Status {
            status: 503,
            body: "down".into(),
        });
        assert!(matches!(server, CoreError::Api { status: Some(503), .. }));
    }

    #[test]
    fn not_found_message_names_the_entity() {
        let err = CoreError::not_found("Report", "r-42");
        assert_eq!(err.to_string(), "Report not found: r-42");
    }
}
