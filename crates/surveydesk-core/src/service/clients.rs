// ── Clients ──

use surveydesk_api::{ApiResponse, CacheTag, FetchOptions, FilterSet, Paginated};

use super::{ReadPolicy, ServiceContext};
use crate::model::{Client, CreateClient, EntityId};

const READS: ReadPolicy = ReadPolicy::UNCACHED;
const CREATE_INVALIDATES: &[CacheTag] = &[];

/// Page size used when the client list only feeds a picker.
pub const PICKER_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct ClientsService {
    ctx: ServiceContext,
}

impl ClientsService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// `GET /clients?{query}`
    pub async fn list(&self, query: &FilterSet) -> Option<ApiResponse<Paginated<Client>>> {
        let options = READS.apply(FetchOptions::get().query(query.clone()));
        self.ctx.read("clients.list", "clients", options).await
    }

    /// The first `PICKER_PAGE_SIZE` clients, for forms that link a record
    /// to a client.
    pub async fn picker(&self) -> Option<ApiResponse<Paginated<Client>>> {
        self.list(&FilterSet::new().with("page", 1u32).with("pageSize", PICKER_PAGE_SIZE))
            .await
    }

    /// `GET /clients/{id}`
    pub async fn get(&self, id: &EntityId) -> Option<ApiResponse<Client>> {
        let path = format!("clients/{}", id.path_segment());
        self.ctx
            .read("clients.get", &path, READS.apply(FetchOptions::get()))
            .await
    }

    /// `POST /clients`
    pub async fn create(&self, client: &CreateClient) -> Option<ApiResponse<Client>> {
        let options = ServiceContext::json_body("clients.create", FetchOptions::post(), client)?;
        self.ctx
            .write("clients.create", "clients", options, CREATE_INVALIDATES)
            .await
    }
}
