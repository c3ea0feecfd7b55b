// ── Page composition ──
//
// One composer per dashboard route. A composer resolves route and query
// parameters, issues the fewest service calls it can (independent calls
// run together under `tokio::join!`), and yields either a rendered page
// or `PageOutcome::NotFound` when a required entity is missing.
// Secondary data, like the client picker on a form, degrades to empty.

use chrono::{Datelike, Local, NaiveDate};
use surveydesk_api::{ApiResponse, FilterSet, Paginated};
use tracing::debug;

use crate::error::CoreError;
use crate::model::{
    BlockedDate, Booking, Calculation, Client, EntityId, Notification, Profile, Report, SurveyMap,
};
use crate::service::{
    AvailabilityService, BookingsService, CalculationsService, ClientsService, MapsService,
    NotificationsService, ProfileService, ReportsService, ServiceContext,
};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

const PAGE_KEY: &str = "page";
const PAGE_SIZE_KEY: &str = "pageSize";
const SEARCH_KEY: &str = "search";
const MONTH_KEY: &str = "month";
const YEAR_KEY: &str = "year";

// ── ListParams ──────────────────────────────────────────────────────

/// Paging and filter state of one list route, as carried in its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// 1-indexed.
    pub page: u32,
    /// Always within `1..=MAX_PAGE_SIZE`.
    pub page_size: u32,
    /// Trimmed, never empty.
    pub search: Option<String>,
    /// Resource-specific filters, in URL order.
    pub filters: FilterSet,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            search: None,
            filters: FilterSet::new(),
        }
    }
}

impl ListParams {
    /// Resolve list state from inbound query parameters.
    ///
    /// Missing or non-numeric `page`/`pageSize` fall back to defaults and
    /// out-of-range values are clamped; untrusted input never reaches the
    /// backend unchecked.
    pub fn from_query(query: &FilterSet) -> Self {
        let mut params = Self::default();
        params.set_page(parse_u32(query.get_str(PAGE_KEY)).unwrap_or(DEFAULT_PAGE));
        params.page_size = clamp_page_size(
            parse_u32(query.get_str(PAGE_SIZE_KEY)).unwrap_or(DEFAULT_PAGE_SIZE),
        );
        params.search = normalize_search(query.get_str(SEARCH_KEY).unwrap_or_default());
        params.filters = query
            .iter()
            .filter(|(key, _)| !matches!(*key, PAGE_KEY | PAGE_SIZE_KEY | SEARCH_KEY))
            .map(|(key, value)| (key.to_owned(), value.clone()))
            .collect();
        params
    }

    /// Shorthand for `from_query(&FilterSet::parse(query))`.
    pub fn parse(query: &str) -> Self {
        Self::from_query(&FilterSet::parse(query))
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Set the page size. Resets to the first page.
    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = clamp_page_size(page_size);
        self.page = DEFAULT_PAGE;
    }

    /// Set the search text. Resets to the first page.
    pub fn set_search(&mut self, search: &str) {
        self.search = normalize_search(search);
        self.page = DEFAULT_PAGE;
    }

    /// The filter set sent to the backend and reflected in the URL.
    pub fn to_filter_set(&self) -> FilterSet {
        let mut set = FilterSet::new()
            .with(PAGE_KEY, self.page)
            .with(PAGE_SIZE_KEY, self.page_size)
            .with(SEARCH_KEY, self.search.as_deref());
        for (key, value) in self.filters.iter() {
            set.insert(key, value.clone());
        }
        set
    }

    /// Canonical `?page=..&pageSize=..` form of this state.
    pub fn query_string(&self) -> String {
        self.to_filter_set().to_query_string()
    }
}

fn parse_u32(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|v| v.trim().parse().ok())
}

fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(1, MAX_PAGE_SIZE)
}

fn normalize_search(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

// ── CalendarParams ──────────────────────────────────────────────────

/// Month shown by the booking calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarParams {
    /// 1..=12
    pub month: u32,
    pub year: i32,
}

impl CalendarParams {
    /// Read `month` and `year`, defaulting each to `today`'s.
    pub fn from_query(query: &FilterSet, today: NaiveDate) -> Self {
        let month = parse_u32(query.get_str(MONTH_KEY))
            .filter(|m| (1..=12).contains(m))
            .unwrap_or_else(|| today.month());
        let year = query
            .get_str(YEAR_KEY)
            .and_then(|v| v.trim().parse::<i32>().ok())
            .filter(|y| (1970..=9999).contains(y))
            .unwrap_or_else(|| today.year());
        Self { month, year }
    }

    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            month: today.month(),
            year: today.year(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month() == self.month && date.year() == self.year
    }

    pub fn to_filter_set(self) -> FilterSet {
        FilterSet::new()
            .with(MONTH_KEY, self.month)
            .with(YEAR_KEY, self.year)
    }
}

// ── Outcomes ────────────────────────────────────────────────────────

/// Terminal state of a page render.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome<T> {
    Rendered(T),
    NotFound,
}

impl<T> PageOutcome<T> {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    pub fn rendered(self) -> Option<T> {
        match self {
            Self::Rendered(page) => Some(page),
            Self::NotFound => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PageOutcome<U> {
        match self {
            Self::Rendered(page) => PageOutcome::Rendered(f(page)),
            Self::NotFound => PageOutcome::NotFound,
        }
    }

    pub fn into_result(self, entity_type: &str, identifier: &str) -> Result<T, CoreError> {
        self.rendered()
            .ok_or_else(|| CoreError::not_found(entity_type, identifier))
    }
}

impl<T> From<Option<T>> for PageOutcome<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::NotFound, Self::Rendered)
    }
}

// ── Page payloads ───────────────────────────────────────────────────

/// A paginated list route.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub params: ListParams,
    pub items: Paginated<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDetailPage {
    pub report: Report,
    /// Picker options for reassigning the report.
    pub clients: Vec<Client>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientDetailPage {
    pub client: Client,
    pub reports: Vec<Report>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarPage {
    pub params: CalendarParams,
    pub bookings: Vec<Booking>,
    pub blocked: Vec<BlockedDate>,
}

impl CalendarPage {
    pub fn is_blocked(&self, date: NaiveDate) -> bool {
        self.blocked.iter().any(|b| b.date == date)
    }

    pub fn bookings_on(&self, date: NaiveDate) -> impl Iterator<Item = &Booking> {
        self.bookings.iter().filter(move |b| b.date == date)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationsPage {
    pub list: ListPage<Calculation>,
    pub clients: Vec<Client>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalculationDetailPage {
    pub calculation: Calculation,
    pub clients: Vec<Client>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotificationsPage {
    pub list: ListPage<Notification>,
    pub unread: u64,
}

// ── Degradation helpers ─────────────────────────────────────────────

fn required<T>(response: Option<ApiResponse<T>>) -> Option<T> {
    response.and_then(ApiResponse::into_data)
}

fn page_or_empty<T>(response: Option<ApiResponse<Paginated<T>>>, params: &ListParams) -> Paginated<T> {
    required(response)
        .unwrap_or_else(|| Paginated::empty(params.page, params.page_size))
        .conform_to(params.page, params.page_size)
}

fn items_or_empty<T>(response: Option<ApiResponse<Vec<T>>>) -> Vec<T> {
    required(response).unwrap_or_default()
}

fn picker_or_empty(response: Option<ApiResponse<Paginated<Client>>>) -> Vec<Client> {
    required(response).map(|page| page.items).unwrap_or_default()
}

fn not_found<T>(route: &'static str, id: &EntityId) -> PageOutcome<T> {
    debug!(route, %id, "required entity missing, rendering not found");
    PageOutcome::NotFound
}

// ── Pages ───────────────────────────────────────────────────────────

/// Composers for every dashboard route.
#[derive(Debug, Clone)]
pub struct Pages {
    clients: ClientsService,
    reports: ReportsService,
    bookings: BookingsService,
    availability: AvailabilityService,
    maps: MapsService,
    calculations: CalculationsService,
    notifications: NotificationsService,
    profile: ProfileService,
}

impl Pages {
    pub fn new(ctx: &ServiceContext) -> Self {
        Self {
            clients: ClientsService::new(ctx.clone()),
            reports: ReportsService::new(ctx.clone()),
            bookings: BookingsService::new(ctx.clone()),
            availability: AvailabilityService::new(ctx.clone()),
            maps: MapsService::new(ctx.clone()),
            calculations: CalculationsService::new(ctx.clone()),
            notifications: NotificationsService::new(ctx.clone()),
            profile: ProfileService::new(ctx.clone()),
        }
    }

    // ── Reports ──────────────────────────────────────────────────────

    /// `/reports?page&pageSize&search`
    pub async fn reports(&self, query: &FilterSet) -> ListPage<Report> {
        let params = ListParams::from_query(query);
        let items = page_or_empty(self.reports.list(&params.to_filter_set()).await, &params);
        ListPage { params, items }
    }

    /// `/reports/{id}`
    pub async fn report(&self, id: &EntityId) -> PageOutcome<ReportDetailPage> {
        let (report, clients) = tokio::join!(self.reports.get(id), self.clients.picker());
        let Some(report) = required(report) else {
            return not_found("report", id);
        };
        PageOutcome::Rendered(ReportDetailPage {
            report,
            clients: picker_or_empty(clients),
        })
    }

    // ── Clients ──────────────────────────────────────────────────────

    /// `/clients?page&pageSize&search`
    pub async fn clients(&self, query: &FilterSet) -> ListPage<Client> {
        let params = ListParams::from_query(query);
        let items = page_or_empty(self.clients.list(&params.to_filter_set()).await, &params);
        ListPage { params, items }
    }

    /// `/clients/{id}`, with the client's reports as a secondary section.
    pub async fn client(&self, id: &EntityId) -> PageOutcome<ClientDetailPage> {
        let reports_query = FilterSet::new()
            .with("clientId", id.as_str())
            .with(PAGE_SIZE_KEY, MAX_PAGE_SIZE);
        let (client, reports) =
            tokio::join!(self.clients.get(id), self.reports.list(&reports_query));
        let Some(client) = required(client) else {
            return not_found("client", id);
        };
        PageOutcome::Rendered(ClientDetailPage {
            client,
            reports: required(reports).map(|page| page.items).unwrap_or_default(),
        })
    }

    // ── Bookings ─────────────────────────────────────────────────────

    /// `/bookings?page&pageSize&search&status`
    pub async fn bookings(&self, query: &FilterSet) -> ListPage<Booking> {
        let params = ListParams::from_query(query);
        let items = page_or_empty(self.bookings.list(&params.to_filter_set()).await, &params);
        ListPage { params, items }
    }

    /// `/bookings/{id}`
    pub async fn booking(&self, id: &EntityId) -> PageOutcome<Booking> {
        match required(self.bookings.get(id).await) {
            Some(booking) => PageOutcome::Rendered(booking),
            None => not_found("booking", id),
        }
    }

    /// `/bookings/calendar?month&year`: the month's bookings next to its
    /// blocked dates. Both halves are optional.
    pub async fn calendar(&self, query: &FilterSet) -> CalendarPage {
        self.calendar_for(CalendarParams::from_query(query, Local::now().date_naive()))
            .await
    }

    pub async fn calendar_for(&self, params: CalendarParams) -> CalendarPage {
        let (bookings, blocked) = tokio::join!(
            self.bookings.calendar(params.month, params.year),
            self.availability.blocked_dates(params.month, params.year),
        );
        CalendarPage {
            params,
            bookings: items_or_empty(bookings),
            blocked: items_or_empty(blocked),
        }
    }

    // ── Maps ─────────────────────────────────────────────────────────

    pub async fn maps(&self, query: &FilterSet) -> ListPage<SurveyMap> {
        let params = ListParams::from_query(query);
        let items = page_or_empty(self.maps.list(&params.to_filter_set()).await, &params);
        ListPage { params, items }
    }

    pub async fn map(&self, id: &EntityId) -> PageOutcome<SurveyMap> {
        match required(self.maps.get(id).await) {
            Some(map) => PageOutcome::Rendered(map),
            None => not_found("map", id),
        }
    }

    // ── Calculations ─────────────────────────────────────────────────

    /// `/calculations`, with the client picker for the create form.
    pub async fn calculations(&self, query: &FilterSet) -> CalculationsPage {
        let params = ListParams::from_query(query);
        let filters = params.to_filter_set();
        let (items, clients) =
            tokio::join!(self.calculations.list(&filters), self.clients.picker());
        CalculationsPage {
            list: ListPage {
                items: page_or_empty(items, &params),
                params,
            },
            clients: picker_or_empty(clients),
        }
    }

    pub async fn calculation(&self, id: &EntityId) -> PageOutcome<CalculationDetailPage> {
        let (calculation, clients) =
            tokio::join!(self.calculations.get(id), self.clients.picker());
        let Some(calculation) = required(calculation) else {
            return not_found("calculation", id);
        };
        PageOutcome::Rendered(CalculationDetailPage {
            calculation,
            clients: picker_or_empty(clients),
        })
    }

    // ── Notifications ────────────────────────────────────────────────

    pub async fn notifications(&self, query: &FilterSet) -> NotificationsPage {
        let params = ListParams::from_query(query);
        let filters = params.to_filter_set();
        let (items, unread) = tokio::join!(
            self.notifications.list(&filters),
            self.notifications.unread_count(),
        );
        NotificationsPage {
            list: ListPage {
                items: page_or_empty(items, &params),
                params,
            },
            unread: required(unread).map_or(0, |u| u.count),
        }
    }

    // ── Profile ──────────────────────────────────────────────────────

    pub async fn profile(&self) -> PageOutcome<Profile> {
        PageOutcome::from(required(self.profile.get().await))
    }
}
