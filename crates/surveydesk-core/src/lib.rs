// surveydesk-core: Resource services, page composition, and list-view state
// between surveydesk-api and consumers (CLI).

pub mod config;
pub mod dashboard;
pub mod debounce;
pub mod error;
pub mod list_view;
pub mod model;
pub mod page;
pub mod service;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DashboardConfig, TlsVerification};
pub use dashboard::Dashboard;
pub use debounce::{CancelHandle, Debouncer};
pub use error::CoreError;
pub use list_view::{FilterEdit, ListView, Loader};
pub use page::{
    CalculationDetailPage, CalculationsPage, CalendarPage, CalendarParams, ClientDetailPage,
    ListPage, ListParams, NotificationsPage, PageOutcome, Pages, ReportDetailPage,
};
pub use service::ServiceContext;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AvatarUpload, BlockedDate, Booking, BookingStatus, Calculation, Client, Coordinate,
    CreateCalculation, CreateClient, CreateMap, EntityId, Notification, Profile, ProfileUpdate,
    ProfileUpdateRequest, Report, ReportStatus, SurveyMap, UnreadCount,
};

// Transport-level types consumers need without a direct api dependency.
pub use surveydesk_api::{ApiResponse, CacheTag, FilterSet, FilterValue, Paginated};
