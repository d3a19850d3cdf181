mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use clipurl::api::handlers::health_handler;
use sqlx::SqlitePool;

fn server(pool: SqlitePool) -> TestServer {
    let state = common::create_test_state(pool);
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_health_endpoint_success(pool: SqlitePool) {
    let server = server(pool);

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert!(json["version"].is_string());
}

#[sqlx::test(migrations = "migrations/sqlite")]
async fn test_health_database_down(pool: SqlitePool) {
    let server = server(pool.clone());
    pool.close().await;

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
}
