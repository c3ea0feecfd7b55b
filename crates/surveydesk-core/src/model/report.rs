use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{Client, EntityId};

/// Lifecycle of a survey report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ReportStatus {
    #[default]
    Draft,
    InProgress,
    Completed,
    Delivered,
    #[serde(other)]
    Unknown,
}

/// A survey report produced for a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(alias = "_id")]
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default)]
    pub client_id: Option<EntityId>,
    /// Embedded client summary when the backend populates it.
    #[serde(default)]
    pub client: Option<Client>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub survey_date: Option<NaiveDate>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Report {
    /// Best available client label: the embedded name, else the id.
    pub fn client_label(&self) -> Option<String> {
        self.client
            .as_ref()
            .map(|c| c.full_name.clone())
            .or_else(|| self.client_id.as_ref().map(ToString::to_string))
    }
}
