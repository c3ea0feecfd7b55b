// ── Notifications ──

use serde::de::IgnoredAny;
use surveydesk_api::{ApiResponse, CacheTag, FetchOptions, FilterSet, Paginated};

use super::{ReadPolicy, ServiceContext, revalidate};
use crate::model::{EntityId, Notification, UnreadCount};

// Polled: the bell badge refreshes every minute.
const READS: ReadPolicy = ReadPolicy::tagged(&[CacheTag::Notifications], revalidate::FAST);
const WRITE_INVALIDATES: &[CacheTag] = &[CacheTag::Notifications];

#[derive(Debug, Clone)]
pub struct NotificationsService {
    ctx: ServiceContext,
}

impl NotificationsService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// `GET /notifications?{query}`
    pub async fn list(&self, query: &FilterSet) -> Option<ApiResponse<Paginated<Notification>>> {
        let options = READS.apply(FetchOptions::get().query(query.clone()));
        self.ctx
            .read("notifications.list", "notifications", options)
            .await
    }

    /// `GET /notifications/unread-count`
    pub async fn unread_count(&self) -> Option<ApiResponse<UnreadCount>> {
        self.ctx
            .read(
                "notifications.unread_count",
                "notifications/unread-count",
                READS.apply(FetchOptions::get()),
            )
            .await
    }

    /// `PATCH /notifications/{id}/read`
    pub async fn mark_read(&self, id: &EntityId) -> Option<ApiResponse<()>> {
        let path = format!("notifications/{}/read", id.path_segment());
        self.ctx
            .write::<IgnoredAny>(
                "notifications.mark_read",
                &path,
                FetchOptions::patch(),
                WRITE_INVALIDATES,
            )
            .await
            .map(|r| r.map(|_| ()))
    }

    /// `PATCH /notifications/read-all`
    pub async fn mark_all_read(&self) -> Option<ApiResponse<()>> {
        self.ctx
            .write::<IgnoredAny>(
                "notifications.mark_all_read",
                "notifications/read-all",
                FetchOptions::patch(),
                WRITE_INVALIDATES,
            )
            .await
            .map(|r| r.map(|_| ()))
    }
}
