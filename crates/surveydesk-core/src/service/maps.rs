// ── Survey maps ──

use serde::de::IgnoredAny;
use surveydesk_api::{ApiResponse, CacheTag, FetchOptions, FilterSet, Paginated};

use super::{ReadPolicy, ServiceContext, revalidate};
use crate::model::{CreateMap, EntityId, SurveyMap};

const READS: ReadPolicy = ReadPolicy::tagged(&[CacheTag::Maps], revalidate::HOURLY);
const WRITE_INVALIDATES: &[CacheTag] = &[CacheTag::Maps];

#[derive(Debug, Clone)]
pub struct MapsService {
    ctx: ServiceContext,
}

impl MapsService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// `GET /maps?{query}`
    pub async fn list(&self, query: &FilterSet) -> Option<ApiResponse<Paginated<SurveyMap>>> {
        let options = READS.apply(FetchOptions::get().query(query.clone()));
        self.ctx.read("maps.list", "maps", options).await
    }

    /// `GET /maps/{id}`
    pub async fn get(&self, id: &EntityId) -> Option<ApiResponse<SurveyMap>> {
        let path = format!("maps/{}", id.path_segment());
        self.ctx
            .read("maps.get", &path, READS.apply(FetchOptions::get()))
            .await
    }

    /// `POST /maps`
    pub async fn create(&self, map: &CreateMap) -> Option<ApiResponse<SurveyMap>> {
        let options = ServiceContext::json_body("maps.create", FetchOptions::post(), map)?;
        self.ctx
            .write("maps.create", "maps", options, WRITE_INVALIDATES)
            .await
    }

    /// `DELETE /maps/{id}`
    pub async fn delete(&self, id: &EntityId) -> Option<ApiResponse<()>> {
        let path = format!("maps/{}", id.path_segment());
        self.ctx
            .write::<IgnoredAny>("maps.delete", &path, FetchOptions::delete(), WRITE_INVALIDATES)
            .await
            .map(|r| r.map(|_| ()))
    }
}
