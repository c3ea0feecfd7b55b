use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::EntityId;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

/// A site-visit booking requested by a prospective client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(alias = "_id")]
    pub id: EntityId,
    #[serde(alias = "name", alias = "fullName")]
    pub client_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "service")]
    pub service_type: Option<String>,
    pub date: NaiveDate,
    #[serde(default, alias = "time")]
    pub time_slot: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "message")]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `PATCH /bookings/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateBookingStatus {
    pub status: BookingStatus,
}
