mod common;

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use sqlx::SqlitePool;

fn server(pool: SqlitePool) -> TestServer {
    TestServer::new(common::create_test_app(pool)).unwrap()
}

/// `flash=...` pair from a `Set-Cookie` header, ready to send back.
fn flash_cookie(response: &TestResponse) -> String {
    let header = response.header("set-cookie");
    let value = header.to_str().unwrap();
    value.split(';').next().unwrap().to_string()
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_index_renders_form(pool: SqlitePool) {
    let server = server(pool);

    let response = server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains(r#"name="long_url""#));
    assert!(html.contains(r#"name="custom_alias""#));
    assert!(html.contains(r#"name="expires_in""#));
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_create_from_form(pool: SqlitePool) {
    let server = server(pool.clone());

    let response = server
        .post("/")
        .add_header("Host", "sho.rt")
        .form(&[
            ("long_url", "example.com/from-form"),
            ("custom_alias", "form-link"),
            ("description", ""),
            ("expires_in", ""),
        ])
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("URL shortened successfully!"));
    assert!(html.contains("http://sho.rt/form-link"));
    assert_eq!(common::url_count(&pool).await, 1);
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_create_existing_from_form(pool: SqlitePool) {
    common::insert_url(&pool, "abc123", None, "https://example.com/dup").await;
    let server = server(pool.clone());

    let response = server
        .post("/")
        .add_header("Host", "sho.rt")
        .form(&[("long_url", "https://example.com/dup")])
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("This URL has already been shortened!"));
    assert!(html.contains("http://sho.rt/abc123"));
    assert_eq!(common::url_count(&pool).await, 1);
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_create_error_flashes_and_redirects(pool: SqlitePool) {
    let server = server(pool.clone());

    let response = server
        .post("/")
        .form(&[("long_url", "javascript:alert(1)")])
        .await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");
    let cookie = flash_cookie(&response);

    let page = server.get("/").add_header("Cookie", cookie.as_str()).await;
    page.assert_status_ok();
    assert!(page.text().contains("URL scheme not allowed"));
    assert!(
        page.header("set-cookie")
            .to_str()
            .unwrap()
            .contains("Max-Age=0")
    );

    assert_eq!(common::url_count(&pool).await, 0);
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_forged_flash_is_ignored(pool: SqlitePool) {
    let server = server(pool);

    let page = server
        .get("/")
        .add_header("Cookie", "flash=eyJsZXZlbCI6InN1Y2Nlc3MifQ.00")
        .await;

    page.assert_status_ok();
    assert!(!page.text().contains(r#"class="flash"#));
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_manage_lists_and_searches(pool: SqlitePool) {
    common::insert_url(&pool, "aaa111", None, "https://rust-lang.org").await;
    common::insert_url(&pool, "bbb222", Some("crates"), "https://crates.io").await;
    let server = server(pool);

    let html = server.get("/manage").await.text();
    assert!(html.contains("aaa111"));
    assert!(html.contains("crates"));

    let html = server.get("/manage?search=RUST").await.text();
    assert!(html.contains("aaa111"));
    assert!(!html.contains("https://crates.io"));

    let html = server.get("/manage?search=nothing-here").await.text();
    assert!(html.contains("No URLs found."));
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_manage_paginates(pool: SqlitePool) {
    for i in 0..25 {
        common::insert_url(&pool, &format!("p{i:05}"), None, &format!("https://example.com/{i}"))
            .await;
    }
    let server = server(pool);

    let first = server.get("/manage").await.text();
    assert!(first.contains("Page 1 of 2"));
    assert!(first.contains("p00024"));
    assert!(!first.contains("p00000"));

    let second = server.get("/manage?page=2").await.text();
    assert!(second.contains("Page 2 of 2"));
    assert!(second.contains("p00000"));

    // Invalid page numbers fall back to the first page.
    let fallback = server.get("/manage?page=abc").await;
    fallback.assert_status_ok();
    assert!(fallback.text().contains("Page 1 of 2"));
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_manage_huge_page_is_empty(pool: SqlitePool) {
    common::insert_url(&pool, "big001", None, "https://example.com").await;
    let server = server(pool);

    let response = server.get("/manage?page=9223372036854775807").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("No URLs found."));
    assert!(!html.contains("big001"));
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_toggle_flips_state(pool: SqlitePool) {
    let url = common::insert_url(&pool, "tog001", None, "https://example.com").await;
    let server = server(pool.clone());

    let response = server.post(&format!("/url/{}/toggle", url.id)).await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/manage");

    let page = server
        .get("/manage")
        .add_header("Cookie", flash_cookie(&response).as_str())
        .await;
    assert!(page.text().contains("URL deactivated successfully!"));

    // Deactivated URLs no longer redirect.
    assert_eq!(server.get("/tog001").await.status_code(), StatusCode::GONE);

    let response = server.post(&format!("/url/{}/toggle", url.id)).await;
    let page = server
        .get("/manage")
        .add_header("Cookie", flash_cookie(&response).as_str())
        .await;
    assert!(page.text().contains("URL activated successfully!"));
    assert_eq!(
        server.get("/tog001").await.status_code(),
        StatusCode::MOVED_PERMANENTLY
    );
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_toggle_unknown_id(pool: SqlitePool) {
    let server = server(pool);

    server.post("/url/999/toggle").await.assert_status_not_found();
    server.post("/url/abc/toggle").await.assert_status_not_found();
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_delete_removes_url_and_clicks(pool: SqlitePool) {
    let url = common::insert_url(&pool, "del001", None, "https://example.com").await;
    common::insert_click(&pool, url.id, "10.0.0.1").await;
    common::insert_click(&pool, url.id, "10.0.0.2").await;
    let server = server(pool.clone());

    let response = server.post(&format!("/url/{}/delete", url.id)).await;

    assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
    let page = server
        .get("/manage")
        .add_header("Cookie", flash_cookie(&response).as_str())
        .await;
    assert!(page.text().contains("URL deleted successfully!"));

    assert_eq!(common::url_count(&pool).await, 0);
    assert_eq!(common::click_count(&pool, url.id).await, 0);
    server.get("/del001").await.assert_status_not_found();
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_delete_unknown_id(pool: SqlitePool) {
    let server = server(pool);

    server.post("/url/42/delete").await.assert_status_not_found();
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_analytics_pages(pool: SqlitePool) {
    let url = common::insert_url(&pool, "ana001", None, "https://example.com/analytics").await;
    common::insert_click(&pool, url.id, "192.0.2.1").await;
    let server = server(pool);

    let response = server.get("/analytics").await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("ana001"));
    assert!(html.contains("Clicks, last 7 days"));

    let response = server.get(&format!("/url/{}/analytics", url.id)).await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("https://example.com/analytics"));
    assert!(html.contains("192.0.2.1"));

    server.get("/url/999/analytics").await.assert_status_not_found();
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_reserved_paths_are_not_identifiers(pool: SqlitePool) {
    let server = server(pool);

    server.get("/manage/").await.assert_status_ok();
    server.get("/analytics").await.assert_status_ok();
    server.get("/no/such/page").await.assert_status_not_found();
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_api_and_redirect_through_full_router(pool: SqlitePool) {
    let server = server(pool.clone());

    let created = server
        .post("/api/shorten")
        .add_header("Host", "sho.rt")
        .json(&serde_json::json!({ "url": "https://example.com/full", "alias": "full" }))
        .await;
    created.assert_status(StatusCode::CREATED);

    let response = server.get("/full").await;
    assert_eq!(response.status_code(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.header("location"), "https://example.com/full");

    let stats = server.get("/api/stats/full").await.json::<serde_json::Value>();
    assert_eq!(stats["click_count"], 1);
}
