// ── Profile ──
//
// The update path is the only place the backend rotates the access token.
// The service hands the new token back in `ProfileUpdate` and leaves
// persisting it to the caller.

use surveydesk_api::{ApiResponse, CacheTag, FetchOptions};

use super::{ReadPolicy, ServiceContext, revalidate};
use crate::model::{Profile, ProfileUpdate, ProfileUpdateRequest, ProfileUpdated};

const READS: ReadPolicy = ReadPolicy::tagged(&[CacheTag::Profile], revalidate::HOURLY);
const UPDATE_INVALIDATES: &[CacheTag] = &[CacheTag::Profile];

#[derive(Debug, Clone)]
pub struct ProfileService {
    ctx: ServiceContext,
}

impl ProfileService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// `GET /users/profile`
    pub async fn get(&self) -> Option<ApiResponse<Profile>> {
        self.ctx
            .read("profile.get", "users/profile", READS.apply(FetchOptions::get()))
            .await
    }

    /// `PUT /users/profile` as multipart form data.
    pub async fn update(&self, request: ProfileUpdateRequest) -> Option<ProfileUpdate> {
        let options = FetchOptions::put().form(request.into_form());
        self.ctx
            .write::<ProfileUpdated>("profile.update", "users/profile", options, UPDATE_INVALIDATES)
            .await
            .map(ProfileUpdate::from_response)
    }
}
