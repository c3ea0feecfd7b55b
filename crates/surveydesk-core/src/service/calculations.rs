// ── Area calculations ──

use serde::de::IgnoredAny;
use surveydesk_api::{ApiResponse, CacheTag, FetchOptions, FilterSet, Paginated};

use super::{ReadPolicy, ServiceContext, revalidate};
use crate::model::{Calculation, CreateCalculation, EntityId};

const READS: ReadPolicy = ReadPolicy::tagged(&[CacheTag::Calculations], revalidate::HOURLY);
const WRITE_INVALIDATES: &[CacheTag] = &[CacheTag::Calculations];

#[derive(Debug, Clone)]
pub struct CalculationsService {
    ctx: ServiceContext,
}

impl CalculationsService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// `GET /calculations?{query}`
    pub async fn list(&self, query: &FilterSet) -> Option<ApiResponse<Paginated<Calculation>>> {
        let options = READS.apply(FetchOptions::get().query(query.clone()));
        self.ctx
            .read("calculations.list", "calculations", options)
            .await
    }

    /// `GET /calculations/{id}`
    pub async fn get(&self, id: &EntityId) -> Option<ApiResponse<Calculation>> {
        let path = format!("calculations/{}", id.path_segment());
        self.ctx
            .read("calculations.get", &path, READS.apply(FetchOptions::get()))
            .await
    }

    /// `POST /calculations`
    pub async fn create(&self, calculation: &CreateCalculation) -> Option<ApiResponse<Calculation>> {
        let options =
            ServiceContext::json_body("calculations.create", FetchOptions::post(), calculation)?;
        self.ctx
            .write(
                "calculations.create",
                "calculations",
                options,
                WRITE_INVALIDATES,
            )
            .await
    }

    /// `DELETE /calculations/{id}`
    pub async fn delete(&self, id: &EntityId) -> Option<ApiResponse<()>> {
        let path = format!("calculations/{}", id.path_segment());
        self.ctx
            .write::<IgnoredAny>(
                "calculations.delete",
                &path,
                FetchOptions::delete(),
                WRITE_INVALIDATES,
            )
            .await
            .map(|r| r.map(|_| ()))
    }
}
