// ── Dashboard domain model ──
//
// Wire-shaped types for every backend resource. Field names follow the
// backend's camelCase JSON; optional fields default so that a sparse
// payload still deserializes.

pub mod availability;
pub mod booking;
pub mod calculation;
pub mod client;
pub mod entity_id;
pub mod map;
pub mod notification;
pub mod profile;
pub mod report;

// ── Re-exports ──────────────────────────────────────────────────────

pub use availability::{BlockedDate, ToggleBlockedDate};
pub use booking::{Booking, BookingStatus, UpdateBookingStatus};
pub use calculation::{Calculation, CreateCalculation};
pub use client::{Client, CreateClient};
pub use entity_id::EntityId;
pub use map::{Coordinate, CreateMap, SurveyMap};
pub use notification::{Notification, UnreadCount};
pub use profile::{AvatarUpload, Profile, ProfileUpdate, ProfileUpdateRequest, ProfileUpdated};
pub use report::{Report, ReportStatus};
