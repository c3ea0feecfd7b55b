//! CLI configuration: thin wrapper around `surveydesk_config` that layers
//! command-line flag overrides on top.
//!
//! Core never sees these types; it receives a pre-built `DashboardConfig`.

use std::time::Duration;

use secrecy::SecretString;

pub use surveydesk_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config,
    store_access_token,
};
use surveydesk_core::{DashboardConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// What commands need to know about the profile they run against.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub profile_name: String,
    /// Whether a rotated token should persist to the keyring.
    pub persist_tokens: bool,
    pub production: bool,
    pub page_size: u32,
}

// ── Profile resolution ───────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `DashboardConfig` from the config file, active profile, and
/// flag overrides.
pub fn resolve(global: &GlobalOpts) -> Result<(DashboardConfig, RunContext), CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let dashboard = resolve_profile(profile, &profile_name, &cfg.defaults, global)?;
        let context = RunContext {
            profile_name,
            persist_tokens: global.access_token.is_none(),
            production: profile.production,
            page_size: cfg.defaults.page_size,
        };
        return Ok((dashboard, context));
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() && global.api_url.is_none() {
        let available = cfg.profile_names();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    // No profile -- build from flags / env vars alone.
    let url_str = global.api_url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url = surveydesk_config::parse_api_url(url_str)?;

    let token = global
        .access_token
        .clone()
        .map(SecretString::from)
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.clone(),
        })?;

    let mut dashboard = DashboardConfig::new(url).with_access_token(token);
    dashboard.timeout = Duration::from_secs(cfg.defaults.timeout);
    dashboard.debounce = Duration::from_millis(cfg.defaults.debounce_ms);
    apply_overrides(&mut dashboard, global);

    let context = RunContext {
        profile_name,
        persist_tokens: false,
        production: false,
        page_size: cfg.defaults.page_size,
    };
    Ok((dashboard, context))
}

/// Translate a profile + global flags into a `DashboardConfig`.
///
/// Flags win over environment, environment over the profile.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<DashboardConfig, CliError> {
    let mut dashboard = match global.access_token {
        Some(ref token) => surveydesk_config::build_dashboard_config_with_token(
            profile,
            defaults,
            SecretString::from(token.clone()),
        )?,
        None => surveydesk_config::build_dashboard_config(profile, profile_name, defaults)?,
    };

    if let Some(ref url_str) = global.api_url {
        dashboard.base_url = surveydesk_config::parse_api_url(url_str)?;
    }
    apply_overrides(&mut dashboard, global);
    Ok(dashboard)
}

fn apply_overrides(dashboard: &mut DashboardConfig, global: &GlobalOpts) {
    if global.insecure {
        dashboard.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        dashboard.timeout = Duration::from_secs(secs);
    }
}
