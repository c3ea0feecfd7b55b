#![allow(clippy::unwrap_used)]
// Page composer tests: parameter resolution, required vs optional data,
// and concurrent secondary calls.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use surveydesk_api::{MemoryCache, RemoteClient, Session, TransportConfig};
use surveydesk_core::{CalendarParams, Dashboard, EntityId, FilterSet, PageOutcome, Pages};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Pages) {
    let server = MockServer::start().await;
    let client = RemoteClient::new(
        &format!("{}/api", server.uri()),
        &TransportConfig::default(),
        Arc::new(Session::anonymous()),
        Arc::new(MemoryCache::new()),
    )
    .unwrap();
    let pages = Dashboard::from_client(Arc::new(client)).pages();
    (server, pages)
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "statusCode": 200,
        "message": "ok",
        "data": data
    }))
}

fn not_found(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "success": false,
        "statusCode": 404,
        "message": message
    }))
}

fn reports(count: usize) -> Value {
    let items: Vec<Value> = (0..count)
        .map(|i| json!({ "id": format!("r-{i}"), "title": format!("Survey {i}") }))
        .collect();
    json!({ "items": items, "page": 2, "pageSize": 10, "total": 31 })
}

fn clients() -> Value {
    json!({
        "data": [{ "id": "c-1", "fullName": "Grace Hopper" }],
        "page": 1,
        "limit": 100,
        "totalItems": 1
    })
}

// ── Reports ─────────────────────────────────────────────────────────

#[tokio::test]
async fn reports_list_forwards_query_and_caps_items() {
    let (server, pages) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "10"))
        .and(query_param("search", "survey"))
        .respond_with(ok(reports(12)))
        .expect(1)
        .mount(&server)
        .await;

    let page = pages
        .reports(&FilterSet::parse("page=2&pageSize=10&search=survey"))
        .await;

    assert_eq!(page.params.page, 2);
    assert_eq!(page.params.search.as_deref(), Some("survey"));
    assert!(page.items.len() <= 10);
    assert_eq!(page.items.total_pages(), 4);
}

#[tokio::test]
async fn reports_list_keeps_requested_size_when_backend_omits_it() {
    let (server, pages) = setup().await;

    let items: Vec<Value> = (0..25)
        .map(|i| json!({ "id": format!("r-{i}"), "title": format!("Survey {i}") }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .and(query_param("pageSize", "25"))
        .respond_with(ok(json!({ "items": items, "total": 30 })))
        .expect(1)
        .mount(&server)
        .await;

    let page = pages.reports(&FilterSet::parse("pageSize=25")).await;

    assert_eq!(page.items.len(), 25);
    assert_eq!((page.items.page, page.items.page_size), (1, 25));
    assert_eq!(page.items.total_pages(), 2);
}

#[tokio::test]
async fn reports_list_caps_items_at_requested_size_despite_larger_echo() {
    let (server, pages) = setup().await;

    let items: Vec<Value> = (0..40)
        .map(|i| json!({ "id": format!("r-{i}"), "title": format!("Survey {i}") }))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .respond_with(ok(json!({ "items": items, "page": 1, "pageSize": 40, "total": 40 })))
        .mount(&server)
        .await;

    let page = pages.reports(&FilterSet::parse("pageSize=10")).await;

    assert_eq!(page.items.len(), 10);
    assert_eq!(page.items.page_size, 10);
}

#[tokio::test]
async fn reports_list_failure_renders_empty_page() {
    let (server, pages) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let page = pages.reports(&FilterSet::parse("page=3")).await;

    assert!(page.items.is_empty());
    assert_eq!((page.items.page, page.items.page_size), (3, 10));
}

#[tokio::test]
async fn unknown_report_renders_not_found() {
    let (server, pages) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/missing"))
        .respond_with(not_found("Report not found"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ok(clients()))
        .mount(&server)
        .await;

    let outcome = pages.report(&EntityId::new("missing")).await;

    assert!(outcome.is_not_found());
}

#[tokio::test]
async fn report_detail_degrades_client_picker_to_empty() {
    let (server, pages) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/r-1"))
        .respond_with(ok(json!({ "id": "r-1", "title": "Boundary survey", "status": "completed" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let PageOutcome::Rendered(detail) = pages.report(&EntityId::new("r-1")).await else {
        panic!("expected rendered report");
    };

    assert_eq!(detail.report.title, "Boundary survey");
    assert!(detail.clients.is_empty());
}

#[tokio::test]
async fn report_detail_includes_client_picker() {
    let (server, pages) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/r-1"))
        .respond_with(ok(json!({ "id": "r-1", "title": "Boundary survey" })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .and(query_param("pageSize", "100"))
        .respond_with(ok(clients()))
        .expect(1)
        .mount(&server)
        .await;

    let detail = pages.report(&EntityId::new("r-1")).await.rendered().unwrap();

    assert_eq!(detail.clients.len(), 1);
    assert_eq!(detail.clients[0].full_name, "Grace Hopper");
}

// ── Calendar ────────────────────────────────────────────────────────

#[tokio::test]
async fn calendar_combines_bookings_and_blocked_dates() {
    let (server, pages) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/bookings/calendar"))
        .and(query_param("month", "4"))
        .and(query_param("year", "2026"))
        .respond_with(ok(json!([
            { "id": 1, "clientName": "Alan", "date": "2026-04-02", "status": "pending" },
            { "id": 2, "clientName": "Barbara", "date": "2026-04-02", "status": "confirmed" }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/blocked-dates"))
        .and(query_param("month", "4"))
        .and(query_param("year", "2026"))
        .respond_with(ok(json!([{ "date": "2026-04-10", "reason": "Equipment service" }])))
        .mount(&server)
        .await;

    let page = pages
        .calendar_for(CalendarParams {
            month: 4,
            year: 2026,
        })
        .await;

    let second = "2026-04-02".parse().unwrap();
    assert_eq!(page.bookings_on(second).count(), 2);
    assert!(page.is_blocked("2026-04-10".parse().unwrap()));
    assert!(!page.is_blocked(second));
}

#[tokio::test]
async fn calendar_tolerates_missing_blocked_dates() {
    let (server, pages) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/bookings/calendar"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/blocked-dates"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let page = pages.calendar(&FilterSet::parse("month=2&year=2027")).await;

    assert_eq!(page.params, CalendarParams { month: 2, year: 2027 });
    assert!(page.bookings.is_empty());
    assert!(page.blocked.is_empty());
}

// ── Notifications ───────────────────────────────────────────────────

#[tokio::test]
async fn notifications_page_carries_unread_count() {
    let (server, pages) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(ok(json!({
            "items": [{ "id": "n-1", "title": "New booking", "message": "Alan booked", "isRead": false }],
            "page": 1,
            "pageSize": 10,
            "total": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/notifications/unread-count"))
        .respond_with(ok(json!({ "count": 3 })))
        .mount(&server)
        .await;

    let page = pages.notifications(&FilterSet::new()).await;

    assert_eq!(page.unread, 3);
    assert_eq!(page.list.items.len(), 1);
    assert!(!page.list.items.items[0].read);
}

// ── Profile & calculations ──────────────────────────────────────────

#[tokio::test]
async fn profile_failure_is_not_found() {
    let (server, pages) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/users/profile"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "Unauthorized"
        })))
        .mount(&server)
        .await;

    assert!(pages.profile().await.is_not_found());
}

#[tokio::test]
async fn calculation_detail_requires_the_calculation() {
    let (server, pages) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/calculations/c-2"))
        .respond_with(ok(json!({
            "id": "c-2",
            "title": "Plot 14",
            "sides": [30.0, 40.0, 30.0, 40.0],
            "area": 1200.0,
            "unit": "m"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/calculations/c-404"))
        .respond_with(not_found("Calculation not found"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/clients"))
        .respond_with(ok(clients()))
        .mount(&server)
        .await;

    let found = pages.calculation(&EntityId::new("c-2")).await.rendered().unwrap();
    assert_eq!(found.calculation.sides.len(), 4);
    assert_eq!(found.clients.len(), 1);

    assert!(pages.calculation(&EntityId::new("c-404")).await.is_not_found());
}
