use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::EntityId;

/// A saved land-area calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calculation {
    #[serde(alias = "_id")]
    pub id: EntityId,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub client_id: Option<EntityId>,
    /// Measured side lengths, in `unit`.
    #[serde(default)]
    pub sides: Vec<f64>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /calculations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCalculation {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<EntityId>,
    pub sides: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
