//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use surveydesk_config::ConfigError;
use surveydesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend at {url}")]
    #[diagnostic(
        code(surveydesk::connection_failed),
        help(
            "Check that the API is running and reachable.\n\
             Reason: {reason}\n\
             Try: surveydesk config show"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(surveydesk::auth_failed),
        help(
            "The access token was rejected or has expired.\n\
             Run: surveydesk config set-token --profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("No access token configured for profile '{profile}'")]
    #[diagnostic(
        code(surveydesk::no_credentials),
        help(
            "Configure one with: surveydesk config init\n\
             Or set the SURVEYDESK_ACCESS_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(surveydesk::not_found),
        help("Run: surveydesk {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error{}: {message}", status_suffix(*.status))]
    #[diagnostic(code(surveydesk::api_error))]
    ApiError { status: Option<u16>, message: String },

    #[error("Could not {operation}")]
    #[diagnostic(
        code(surveydesk::request_failed),
        help("The backend did not answer. Re-run with -v for details.")
    )]
    RequestFailed { operation: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(surveydesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(surveydesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: surveydesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(surveydesk::no_config),
        help(
            "Create one with: surveydesk config init\n\
             Or pass --api-url and --access-token.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(surveydesk::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(surveydesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out")]
    #[diagnostic(
        code(surveydesk::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── IO ─────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::RequestFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. }
            | Self::NoCredentials { .. }
            | Self::Config(ConfigError::NoCredentials { .. }) => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::Config(ConfigError::Validation { .. }) => exit_code::USAGE,
            Self::ApiError { status, .. } => match status {
                Some(401 | 403) => exit_code::AUTH,
                Some(404) => exit_code::NOT_FOUND,
                Some(409) => exit_code::CONFLICT,
                _ => exit_code::GENERAL,
            },
            _ => exit_code::GENERAL,
        }
    }

    /// A `NotFound` for `resource_type`, pointing at its list command.
    pub fn not_found(resource_type: &str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: format!("{resource_type}s list"),
        }
    }
}

fn status_suffix(status: Option<u16>) -> String {
    status.map_or_else(String::new, |s| format!(" ({s})"))
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => Self::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message: _ } => Self::AuthFailed {
                profile: "current".into(),
            },

            CoreError::Timeout => Self::Timeout,

            CoreError::NotFound {
                entity_type,
                identifier,
            } => Self::not_found(&entity_type, identifier),

            CoreError::Api { message, status } => Self::ApiError { status, message },

            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => Self::ApiError {
                status: None,
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
