//! Shared helpers for command handlers.

use std::io::IsTerminal;

use surveydesk_core::{ApiResponse, Coordinate, EntityId, FilterSet};

use crate::cli::ListArgs;
use crate::error::CliError;

/// Unwrap a service result for a command that cannot degrade.
///
/// `None` means the backend never answered; a failure envelope carries
/// the backend's own message and status.
pub fn expect_success<T>(response: Option<ApiResponse<T>>, operation: &str) -> Result<T, CliError> {
    match response {
        None => Err(CliError::RequestFailed {
            operation: operation.into(),
        }),
        Some(ApiResponse::Success { data, .. }) => Ok(data),
        Some(ApiResponse::Failure {
            status_code,
            message,
        }) => Err(CliError::ApiError {
            status: status_code,
            message,
        }),
    }
}

/// Build the inbound query for a list page from `ListArgs`.
///
/// Range checks happen downstream when the page resolves its params.
pub fn list_query(args: &ListArgs, default_page_size: u32) -> Result<FilterSet, CliError> {
    let mut query = FilterSet::new()
        .with("page", args.page)
        .with("pageSize", args.page_size.unwrap_or(default_page_size))
        .with("search", args.search.as_deref());

    for raw in &args.filter {
        let (key, value) = parse_key_value(raw)?;
        if matches!(key, "page" | "pageSize" | "search") {
            return Err(CliError::Validation {
                field: "filter".into(),
                reason: format!("use --{} instead of --filter {key}=...", flag_for(key)),
            });
        }
        query.append(key, value);
    }
    Ok(query)
}

fn flag_for(key: &str) -> &'static str {
    match key {
        "pageSize" => "page-size",
        "search" => "search",
        _ => "page",
    }
}

/// Split `key=value`, rejecting an empty key.
pub fn parse_key_value(raw: &str) -> Result<(&str, &str), CliError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(CliError::Validation {
            field: "filter".into(),
            reason: format!("expected KEY=VALUE, got '{raw}'"),
        }),
    }
}

/// Parse a `LAT,LNG` pair.
pub fn parse_point(raw: &str) -> Result<Coordinate, CliError> {
    let invalid = || CliError::Validation {
        field: "point".into(),
        reason: format!("expected LAT,LNG, got '{raw}'"),
    };
    let (lat, lng) = raw.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lng: f64 = lng.trim().parse().map_err(|_| invalid())?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(CliError::Validation {
            field: "point".into(),
            reason: format!("'{raw}' is outside valid latitude/longitude ranges"),
        });
    }
    Ok(Coordinate { lat, lng })
}

pub fn optional_id(raw: Option<String>) -> Option<EntityId> {
    raw.filter(|s| !s.trim().is_empty()).map(EntityId::from)
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Refuses outright when stdin is not a terminal, so scripts fail loudly
/// instead of hanging.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
