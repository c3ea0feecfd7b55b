// ── Dashboard facade ──
//
// Owns the remote client, session, and response cache for one backend,
// and hands out services, page composers, and list views that share them.

use std::sync::Arc;
use std::time::Duration;

use surveydesk_api::{
    MemoryCache, Paginated, RemoteClient, Session, TagCache, TlsMode, TransportConfig,
};
use tracing::{debug, info};

use crate::config::{DashboardConfig, TlsVerification};
use crate::debounce::Debouncer;
use crate::error::CoreError;
use crate::list_view::{ListView, Loader};
use crate::model::ProfileUpdate;
use crate::page::{ListParams, Pages};
use crate::service::{
    AvailabilityService, BookingsService, CalculationsService, ClientsService, MapsService,
    NotificationsService, ProfileService, ReportsService, ServiceContext,
};

#[derive(Debug, Clone)]
pub struct Dashboard {
    ctx: ServiceContext,
    debounce: Duration,
}

impl Dashboard {
    /// Connect with a fresh in-memory response cache.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        Self::with_cache(config, Arc::new(MemoryCache::new()))
    }

    /// Connect using the given response cache.
    pub fn with_cache(
        config: DashboardConfig,
        cache: Arc<dyn TagCache>,
    ) -> Result<Self, CoreError> {
        let transport = TransportConfig::default()
            .with_timeout(config.timeout)
            .with_tls(tls_mode(&config.tls));
        let session = Arc::new(Session::new(config.access_token));
        let client = RemoteClient::new(config.base_url.as_str(), &transport, session, cache)?;

        info!(
            base_url = %client.base_url(),
            authenticated = client.session().is_authenticated(),
            "dashboard ready"
        );

        Ok(Self {
            ctx: ServiceContext::new(Arc::new(client)),
            debounce: config.debounce,
        })
    }

    /// Wrap an already-built client.
    pub fn from_client(client: Arc<RemoteClient>) -> Self {
        Self {
            ctx: ServiceContext::new(client),
            debounce: Debouncer::DEFAULT_DELAY,
        }
    }

    pub fn client(&self) -> &Arc<RemoteClient> {
        self.ctx.client()
    }

    pub fn session(&self) -> &Arc<Session> {
        self.ctx.client().session()
    }

    // ── Services ─────────────────────────────────────────────────────

    pub fn clients(&self) -> ClientsService {
        ClientsService::new(self.ctx.clone())
    }

    pub fn reports(&self) -> ReportsService {
        ReportsService::new(self.ctx.clone())
    }

    pub fn bookings(&self) -> BookingsService {
        BookingsService::new(self.ctx.clone())
    }

    pub fn availability(&self) -> AvailabilityService {
        AvailabilityService::new(self.ctx.clone())
    }

    pub fn maps(&self) -> MapsService {
        MapsService::new(self.ctx.clone())
    }

    pub fn calculations(&self) -> CalculationsService {
        CalculationsService::new(self.ctx.clone())
    }

    pub fn notifications(&self) -> NotificationsService {
        NotificationsService::new(self.ctx.clone())
    }

    pub fn profile(&self) -> ProfileService {
        ProfileService::new(self.ctx.clone())
    }

    pub fn pages(&self) -> Pages {
        Pages::new(&self.ctx)
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Apply a token rotated by a profile update to this session.
    /// Returns `true` if a new token was applied. Persisting it beyond
    /// the process is up to the caller.
    pub fn apply_profile_update(&self, update: &ProfileUpdate) -> bool {
        match &update.new_token {
            Some(token) => {
                self.session().replace(token.clone());
                debug!("session token rotated");
                true
            }
            None => false,
        }
    }

    // ── List views ───────────────────────────────────────────────────

    /// A list view using this dashboard's debounce delay.
    pub fn list_view<T: Send + Sync + 'static>(
        &self,
        params: ListParams,
        initial: Paginated<T>,
        loader: Loader<T>,
    ) -> ListView<T> {
        ListView::with_delay(params, initial, loader, self.debounce)
    }
}

fn tls_mode(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
