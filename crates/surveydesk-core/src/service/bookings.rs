// ── Bookings ──

use surveydesk_api::{ApiResponse, CacheTag, FetchOptions, FilterSet, Paginated};

use super::{ReadPolicy, ServiceContext, revalidate};
use crate::model::{Booking, BookingStatus, EntityId, UpdateBookingStatus};

const READS: ReadPolicy = ReadPolicy::tagged(&[CacheTag::Bookings], revalidate::FAST);
const STATUS_INVALIDATES: &[CacheTag] = &[CacheTag::Bookings];

#[derive(Debug, Clone)]
pub struct BookingsService {
    ctx: ServiceContext,
}

impl BookingsService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// `GET /bookings?{query}`
    pub async fn list(&self, query: &FilterSet) -> Option<ApiResponse<Paginated<Booking>>> {
        let options = READS.apply(FetchOptions::get().query(query.clone()));
        self.ctx.read("bookings.list", "bookings", options).await
    }

    /// `GET /bookings/{id}`
    pub async fn get(&self, id: &EntityId) -> Option<ApiResponse<Booking>> {
        let path = format!("bookings/{}", id.path_segment());
        self.ctx
            .read("bookings.get", &path, READS.apply(FetchOptions::get()))
            .await
    }

    /// `GET /bookings/calendar?month&year`: every booking in one month.
    pub async fn calendar(&self, month: u32, year: i32) -> Option<ApiResponse<Vec<Booking>>> {
        let query = FilterSet::new().with("month", month).with("year", year);
        let options = READS.apply(FetchOptions::get().query(query));
        self.ctx
            .read("bookings.calendar", "bookings/calendar", options)
            .await
    }

    /// `PATCH /bookings/{id}/status`
    pub async fn update_status(
        &self,
        id: &EntityId,
        status: BookingStatus,
    ) -> Option<ApiResponse<Booking>> {
        let path = format!("bookings/{}/status", id.path_segment());
        let options = ServiceContext::json_body(
            "bookings.update_status",
            FetchOptions::patch(),
            &UpdateBookingStatus { status },
        )?;
        self.ctx
            .write("bookings.update_status", &path, options, STATUS_INVALIDATES)
            .await
    }
}
