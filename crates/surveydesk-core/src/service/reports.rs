// ── Reports ──

use surveydesk_api::{ApiResponse, FetchOptions, FilterSet, Paginated};

use super::{ReadPolicy, ServiceContext};
use crate::model::{EntityId, Report};

// Reports change as field work progresses; always read fresh.
const READS: ReadPolicy = ReadPolicy::UNCACHED;

#[derive(Debug, Clone)]
pub struct ReportsService {
    ctx: ServiceContext,
}

impl ReportsService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// `GET /reports?{query}`
    pub async fn list(&self, query: &FilterSet) -> Option<ApiResponse<Paginated<Report>>> {
        let options = READS.apply(FetchOptions::get().query(query.clone()));
        self.ctx.read("reports.list", "reports", options).await
    }

    /// `GET /reports/{id}`
    pub async fn get(&self, id: &EntityId) -> Option<ApiResponse<Report>> {
        let path = format!("reports/{}", id.path_segment());
        self.ctx
            .read("reports.get", &path, READS.apply(FetchOptions::get()))
            .await
    }
}
