#![allow(clippy::unwrap_used)]
// Integration tests for `RemoteClient` using wiremock.

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use wiremock::matchers::{body_json, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use surveydesk_api::{
    ApiResponse, CacheTag, Error, FetchOptions, FilterSet, FormPart, MemoryCache, Paginated,
    RemoteClient, Session, TransportConfig,
};

#[derive(Debug, Deserialize, PartialEq)]
struct Report {
    id: String,
    title: String,
}

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RemoteClient) {
    setup_with_session(Session::anonymous()).await
}

async fn setup_with_session(session: Session) -> (MockServer, RemoteClient) {
    let server = MockServer::start().await;
    let client = RemoteClient::new(
        &format!("{}/api", server.uri()),
        &TransportConfig::default(),
        Arc::new(session),
        Arc::new(MemoryCache::new()),
    )
    .unwrap();
    (server, client)
}

fn ok(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "statusCode": 200,
        "message": "ok",
        "data": data
    }))
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_decodes_paginated_envelope_with_encoded_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "10"))
        .and(query_param("search", "survey"))
        .respond_with(ok(json!({
            "items": [{ "id": "r1", "title": "Boundary survey" }],
            "page": 2,
            "pageSize": 10,
            "total": 11
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = FilterSet::parse("?page=2&pageSize=10&search=survey");
    let resp: ApiResponse<Paginated<Report>> = client
        .fetch("reports", FetchOptions::get().query(query))
        .await
        .unwrap();

    let page = resp.into_data().unwrap();
    assert!(page.items.len() <= 10);
    assert_eq!(page.items[0].title, "Boundary survey");
    assert_eq!(page.page, 2);
}

#[tokio::test]
async fn test_bearer_token_is_attached() {
    let session = Session::new(Some(SecretString::from("tok-123".to_owned())));
    let (server, client) = setup_with_session(session).await;

    Mock::given(method("GET"))
        .and(path("/api/users/profile"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ok(json!({ "id": "u1", "title": "me" })))
        .expect(1)
        .mount(&server)
        .await;

    let resp: ApiResponse<Report> = client
        .fetch("users/profile", FetchOptions::get())
        .await
        .unwrap();
    assert!(resp.is_success());
}

// ── Caching ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_tagged_read_is_served_from_cache() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/maps"))
        .respond_with(ok(json!({ "items": [], "page": 1, "pageSize": 10, "total": 0 })))
        .expect(1)
        .mount(&server)
        .await;

    for _ in 0..3 {
        let resp: ApiResponse<Paginated<Report>> = client
            .fetch("maps", FetchOptions::get().tags(&[CacheTag::Maps]))
            .await
            .unwrap();
        assert!(resp.is_success());
    }
}

#[tokio::test]
async fn test_invalidate_forces_fresh_fetch() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/bookings/calendar"))
        .respond_with(ok(json!([])))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/bookings/calendar"))
        .respond_with(ok(json!([{ "id": "b1", "title": "new booking" }])))
        .expect(1)
        .mount(&server)
        .await;

    let options = || {
        FetchOptions::get()
            .tags(&[CacheTag::Bookings])
            .revalidate(Duration::from_secs(60))
    };

    let first: ApiResponse<Vec<Report>> =
        client.fetch("bookings/calendar", options()).await.unwrap();
    assert!(first.data().unwrap().is_empty());

    let cached: ApiResponse<Vec<Report>> =
        client.fetch("bookings/calendar", options()).await.unwrap();
    assert!(cached.data().unwrap().is_empty());

    assert_eq!(client.invalidate(CacheTag::Bookings), 1);

    let fresh: ApiResponse<Vec<Report>> =
        client.fetch("bookings/calendar", options()).await.unwrap();
    assert_eq!(fresh.data().unwrap().len(), 1);
}

#[tokio::test]
async fn test_untagged_reads_are_not_cached() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/r1"))
        .respond_with(ok(json!({ "id": "r1", "title": "t" })))
        .expect(2)
        .mount(&server)
        .await;

    for _ in 0..2 {
        let _: ApiResponse<Report> = client
            .fetch("reports/r1", FetchOptions::get())
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_failure_envelope_is_not_cached() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/notifications"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "success": false, "message": "boom" })),
        )
        .expect(2)
        .mount(&server)
        .await;

    for _ in 0..2 {
        let resp: ApiResponse<Vec<Report>> = client
            .fetch(
                "notifications",
                FetchOptions::get().tags(&[CacheTag::Notifications]),
            )
            .await
            .unwrap();
        assert!(!resp.is_success());
    }
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_post_sends_json_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/blocked-dates/toggle"))
        .and(body_json(json!({ "date": "2025-07-04" })))
        .respond_with(ok(json!(null)))
        .expect(1)
        .mount(&server)
        .await;

    let resp: ApiResponse<()> = client
        .fetch(
            "blocked-dates/toggle",
            FetchOptions::post()
                .json(&json!({ "date": "2025-07-04" }))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(resp.is_success());
}

#[tokio::test]
async fn test_put_sends_multipart_form() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/users/profile"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .respond_with(ok(json!({ "id": "u1", "title": "updated" })))
        .expect(1)
        .mount(&server)
        .await;

    let resp: ApiResponse<Report> = client
        .fetch(
            "users/profile",
            FetchOptions::put().form(vec![
                FormPart::text("fullName", "Ada Surveyor"),
                FormPart::File {
                    name: "avatar".into(),
                    file_name: "avatar.png".into(),
                    content_type: Some("image/png".into()),
                    bytes: vec![0x89, 0x50, 0x4e, 0x47],
                },
            ]),
        )
        .await
        .unwrap();
    assert_eq!(resp.data().unwrap().title, "updated");
}

// ── Errors ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_not_found_envelope_is_a_failure_not_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/reports/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_json(json!({ "success": false, "message": "Report not found" })),
        )
        .mount(&server)
        .await;

    let resp: ApiResponse<Report> = client
        .fetch("reports/missing", FetchOptions::get())
        .await
        .unwrap();

    match resp {
        ApiResponse::Failure {
            status_code,
            message,
        } => {
            assert_eq!(status_code, Some(404));
            assert_eq!(message, "Report not found");
        }
        other => panic!("expected Failure, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_envelope_error_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let result = client
        .fetch::<Report>("reports/r1", FetchOptions::get())
        .await;

    match result {
        Err(Error::Status { status, ref body }) => {
            assert_eq!(status, 502);
            assert!(body.contains("Bad Gateway"));
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_garbage_success_body_is_a_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client
        .fetch::<Report>("reports/r1", FetchOptions::get())
        .await;

    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_connection_refused_is_a_transport_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = RemoteClient::new(
        &uri,
        &TransportConfig::default(),
        Arc::new(Session::anonymous()),
        Arc::new(MemoryCache::new()),
    )
    .unwrap();

    let result = client.fetch::<Report>("reports", FetchOptions::get()).await;
    assert!(matches!(result, Err(Error::Transport(_))));
}
