//! Shared configuration for the surveydesk CLI.
//!
//! TOML profiles, access-token resolution (env + keyring + plaintext),
//! and translation to `surveydesk_core::DashboardConfig`. The CLI adds
//! flag-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use surveydesk_core::{DashboardConfig, TlsVerification};

const KEYRING_SERVICE: &str = "surveydesk";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' is not defined")]
    UnknownProfile { profile: String },

    #[error("no access token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("keyring error: {0}")]
    Keyring(String),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<keyring::Error> for ConfigError {
    fn from(err: keyring::Error) -> Self {
        Self::Keyring(err.to_string())
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }

    /// Profile names, sorted.
    pub fn profile_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Rows per page for list commands.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Quiet period before a filter edit is committed.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            page_size: default_page_size(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    10
}
fn default_debounce_ms() -> u64 {
    300
}

/// A named backend profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "https://api.example.com/api").
    pub api_url: String,

    /// Access token (plaintext; prefer keyring or env var).
    pub access_token: Option<String>,

    /// Environment variable name containing the access token.
    pub access_token_env: Option<String>,

    /// Production deployment: session cookie is marked `Secure`.
    #[serde(default)]
    pub production: bool,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification (local development only).
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "surveydesk", "surveydesk").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("surveydesk");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + `SURVEYDESK_` environment variables.
///
/// Nested keys use a double underscore, e.g.
/// `SURVEYDESK_DEFAULTS__PAGE_SIZE=25`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SURVEYDESK_").split("__"));

    let config: Config = figment.extract()?;
    debug!(path = %path.display(), profiles = config.profiles.len(), "config loaded");
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

fn keyring_entry(profile_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/access-token"),
    )?)
}

/// Resolve the access token from the credential chain (no CLI flag step).
pub fn resolve_access_token(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's access_token_env → env var lookup
    if let Some(ref env_name) = profile.access_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.access_token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a token in the system keyring, e.g. after a profile update
/// rotated it.
pub fn store_access_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    keyring_entry(profile_name)?.set_password(token.expose_secret())?;
    debug!(profile = profile_name, "access token stored in keyring");
    Ok(())
}

// ── DashboardConfig translation ─────────────────────────────────────

/// Build a `DashboardConfig` from a profile and the global defaults.
pub fn build_dashboard_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<DashboardConfig, ConfigError> {
    let token = resolve_access_token(profile, profile_name)?;
    build_dashboard_config_with_token(profile, defaults, token)
}

/// Like [`build_dashboard_config`], with the token already resolved
/// (e.g. from a command-line flag).
pub fn build_dashboard_config_with_token(
    profile: &Profile,
    defaults: &Defaults,
    token: SecretString,
) -> Result<DashboardConfig, ConfigError> {
    let base_url = parse_api_url(&profile.api_url)?;

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = DashboardConfig::new(base_url).with_access_token(token);
    config.production = profile.production;
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.debounce = Duration::from_millis(defaults.debounce_ms);
    Ok(config)
}

/// Parse and sanity-check an API base URL.
pub fn parse_api_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("expected http or https, got '{}'", url.scheme()),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn file_values_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "office"

[defaults]
page_size = 25

[profiles.office]
api_url = "https://api.example.com/api"
production = true
"#,
        )
        .unwrap();

        let config = load_config_from(&path).unwrap();

        assert_eq!(config.default_profile.as_deref(), Some("office"));
        assert_eq!(config.defaults.page_size, 25);
        assert_eq!(config.defaults.output, "table");
        assert_eq!(config.defaults.debounce_ms, 300);
        assert!(config.profile("office").unwrap().production);
        assert!(matches!(
            config.profile("field"),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.profiles.insert(
            "default".into(),
            Profile {
                api_url: "http://localhost:4000/api".into(),
                timeout: Some(5),
                ..Default::default()
            },
        );

        save_config_to(&config, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();

        assert_eq!(loaded.profile_names(), vec!["default"]);
        assert_eq!(loaded.profile("default").unwrap().timeout, Some(5));
    }

    #[test]
    fn plaintext_token_is_the_last_resort() {
        let profile = Profile {
            api_url: "https://api.example.com".into(),
            access_token: Some("plain-token".into()),
            access_token_env: Some("SURVEYDESK_TEST_UNSET_TOKEN_VAR".into()),
            ..Default::default()
        };
        let token = resolve_access_token(&profile, "config-test-plaintext").unwrap();
        assert_eq!(token.expose_secret(), "plain-token");
    }

    #[test]
    fn env_token_wins_over_plaintext() {
        // PATH is always set, which makes it a stable stand-in.
        let expected = std::env::var("PATH").unwrap();
        let profile = Profile {
            api_url: "https://api.example.com".into(),
            access_token: Some("plain-token".into()),
            access_token_env: Some("PATH".into()),
            ..Default::default()
        };
        let token = resolve_access_token(&profile, "config-test-env").unwrap();
        assert_eq!(token.expose_secret(), expected);
    }

    #[test]
    fn missing_token_is_reported_per_profile() {
        let profile = Profile {
            api_url: "https://api.example.com".into(),
            ..Default::default()
        };
        let err = resolve_access_token(&profile, "config-test-none").unwrap_err();
        assert_eq!(
            err.to_string(),
            "no access token configured for profile 'config-test-none'"
        );
    }

    #[test]
    fn dashboard_config_reflects_profile() {
        let profile = Profile {
            api_url: "https://api.example.com/api".into(),
            access_token: Some("tok".into()),
            ca_cert: Some(PathBuf::from("/etc/ssl/office.pem")),
            timeout: Some(12),
            production: true,
            ..Default::default()
        };
        let defaults = Defaults {
            debounce_ms: 150,
            ..Default::default()
        };

        let config = build_dashboard_config(&profile, "config-test-dash", &defaults).unwrap();

        assert_eq!(config.base_url.as_str(), "https://api.example.com/api");
        assert_eq!(
            config.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/ssl/office.pem"))
        );
        assert_eq!(config.timeout, Duration::from_secs(12));
        assert_eq!(config.debounce, Duration::from_millis(150));
        assert!(config.production);
    }

    #[test]
    fn non_http_urls_are_rejected() {
        assert!(parse_api_url("ftp://example.com").is_err());
        assert!(parse_api_url("not a url").is_err());
        assert!(parse_api_url("http://localhost:4000/api").is_ok());
    }
}
