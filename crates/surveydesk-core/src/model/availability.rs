use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EntityId;

/// A day on which no bookings are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedDate {
    #[serde(default, alias = "_id")]
    pub id: Option<EntityId>,
    pub date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Body of `POST /blocked-dates/toggle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleBlockedDate {
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
