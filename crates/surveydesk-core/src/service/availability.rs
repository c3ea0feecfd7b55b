// ── Availability (blocked dates) ──
//
// Blocked dates rarely change, so reads are cached for a day. Calendar
// availability derives from both blocked dates and bookings, so a toggle
// invalidates both topics.

use chrono::NaiveDate;
use serde::de::IgnoredAny;
use surveydesk_api::{ApiResponse, CacheTag, FetchOptions, FilterSet};

use super::{ReadPolicy, ServiceContext, revalidate};
use crate::model::{BlockedDate, ToggleBlockedDate};

const READS: ReadPolicy = ReadPolicy::tagged(&[CacheTag::BlockedDates], revalidate::DAILY);
const TOGGLE_INVALIDATES: &[CacheTag] = &[CacheTag::BlockedDates, CacheTag::Bookings];

#[derive(Debug, Clone)]
pub struct AvailabilityService {
    ctx: ServiceContext,
}

impl AvailabilityService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// `GET /blocked-dates?month&year`
    pub async fn blocked_dates(
        &self,
        month: u32,
        year: i32,
    ) -> Option<ApiResponse<Vec<BlockedDate>>> {
        let query = FilterSet::new().with("month", month).with("year", year);
        let options = READS.apply(FetchOptions::get().query(query));
        self.ctx
            .read("availability.blocked_dates", "blocked-dates", options)
            .await
    }

    /// `POST /blocked-dates/toggle`: block an open day or reopen a
    /// blocked one.
    pub async fn toggle(
        &self,
        date: NaiveDate,
        reason: Option<String>,
    ) -> Option<ApiResponse<()>> {
        let options = ServiceContext::json_body(
            "availability.toggle",
            FetchOptions::post(),
            &ToggleBlockedDate { date, reason },
        )?;
        self.ctx
            .write::<IgnoredAny>(
                "availability.toggle",
                "blocked-dates/toggle",
                options,
                TOGGLE_INVALIDATES,
            )
            .await
            .map(|r| r.map(|_| ()))
    }
}
