// ── Resource services ──
//
// One thin service per backend resource. Each declares the cache tags its
// reads are filed under and the tags its writes invalidate. Every call
// goes through `ServiceContext`, which is the catch-and-log boundary:
// client-side errors are logged and become `None`, and a write only
// invalidates when the backend answered with a success envelope.

pub mod availability;
pub mod bookings;
pub mod calculations;
pub mod clients;
pub mod maps;
pub mod notifications;
pub mod profile;
pub mod reports;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use surveydesk_api::{ApiResponse, CacheTag, FetchOptions, RemoteClient};
use tracing::{debug, warn};

pub use availability::AvailabilityService;
pub use bookings::BookingsService;
pub use calculations::CalculationsService;
pub use clients::ClientsService;
pub use maps::MapsService;
pub use notifications::NotificationsService;
pub use profile::ProfileService;
pub use reports::ReportsService;

/// Revalidate intervals, by data volatility.
pub(crate) mod revalidate {
    use std::time::Duration;

    pub const FAST: Duration = Duration::from_secs(60);
    pub const HOURLY: Duration = Duration::from_secs(3600);
    pub const DAILY: Duration = Duration::from_secs(86_400);
}

/// Cache directives for one resource's reads.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReadPolicy {
    pub tags: &'static [CacheTag],
    pub revalidate: Option<Duration>,
}

impl ReadPolicy {
    pub const UNCACHED: Self = Self {
        tags: &[],
        revalidate: None,
    };

    pub const fn tagged(tags: &'static [CacheTag], revalidate: Duration) -> Self {
        Self {
            tags,
            revalidate: Some(revalidate),
        }
    }

    pub fn apply(self, options: FetchOptions) -> FetchOptions {
        let options = options.tags(self.tags);
        match self.revalidate {
            Some(interval) => options.revalidate(interval),
            None => options,
        }
    }
}

// ── ServiceContext ──────────────────────────────────────────────────

/// Shared handle every service borrows. Cheap to clone.
#[derive(Clone)]
pub struct ServiceContext {
    client: Arc<RemoteClient>,
}

impl ServiceContext {
    pub fn new(client: Arc<RemoteClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<RemoteClient> {
        &self.client
    }

    /// Issue a request, converting any client-side error into `None`.
    pub(crate) async fn read<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        options: FetchOptions,
    ) -> Option<ApiResponse<T>> {
        match self.client.fetch::<T>(path, options).await {
            Ok(response) => {
                if let ApiResponse::Failure {
                    status_code,
                    message,
                } = &response
                {
                    debug!(operation, ?status_code, %message, "backend returned failure envelope");
                }
                Some(response)
            }
            Err(e) => {
                warn!(operation, error = %e, "request failed");
                None
            }
        }
    }

    /// Issue a write. On a success envelope, every tag in `invalidates`
    /// is evicted; on anything else the cache is left untouched.
    pub(crate) async fn write<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        options: FetchOptions,
        invalidates: &[CacheTag],
    ) -> Option<ApiResponse<T>> {
        let response = self.read::<T>(operation, path, options).await?;
        if response.is_success() {
            for tag in invalidates {
                let evicted = self.client.invalidate(*tag);
                debug!(operation, %tag, evicted, "invalidated cache tag");
            }
        }
        Some(response)
    }

    /// Serialize a JSON body, logging instead of failing.
    pub(crate) fn json_body(
        operation: &'static str,
        options: FetchOptions,
        body: &impl serde::Serialize,
    ) -> Option<FetchOptions> {
        match options.json(body) {
            Ok(options) => Some(options),
            Err(e) => {
                warn!(operation, error = %e, "could not encode request body");
                None
            }
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("base_url", &self.client.base_url().as_str())
            .finish_non_exhaustive()
    }
}
