use std::path::PathBuf;
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use sea_orm::DatabaseConnection;

use hrdesk_admin::config::AdminConfig;
use hrdesk_admin::router::build_router;
use hrdesk_admin::state::AppState;
use hrdesk_core::middleware::REQUEST_ID_HEADER;
use hrdesk_testing::auth::MockAuth;

/// Router backed by no database: only requests stopped before a handler
/// touches storage can succeed.
fn server() -> TestServer {
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        config: Arc::new(AdminConfig {
            database_url: "postgres://unused".to_owned(),
            admin_port: 0,
            public_storage_root: PathBuf::from("unused/public"),
            network_image_root: PathBuf::from("unused/network"),
        }),
    };
    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn should_forbid_hr_from_deleting_business_units() {
    let auth = MockAuth::hr(2);
    let (id_name, id_value) = auth.user_id_header();
    let (role_name, role_value) = auth.user_role_header();

    let response = server()
        .delete("/business-units/bu-1")
        .add_header(id_name, id_value)
        .add_header(role_name, role_value)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<serde_json::Value>()["kind"], "FORBIDDEN");
}

#[tokio::test]
async fn should_forbid_hr_from_admin_only_pages() {
    let server = server();
    let auth = MockAuth::hr(2);
    for (method, path) in [
        ("GET", "/activity-logs"),
        ("DELETE", "/activity-logs"),
        ("GET", "/settings/network-path"),
        ("DELETE", "/templates/1"),
        ("DELETE", "/user-management/3"),
    ] {
        let (id_name, id_value) = auth.user_id_header();
        let (role_name, role_value) = auth.user_role_header();
        let request = match method {
            "GET" => server.get(path),
            _ => server.delete(path),
        };
        let response = request
            .add_header(id_name, id_value)
            .add_header(role_name, role_value)
            .await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN, "{method} {path}");
    }
}

#[tokio::test]
async fn should_route_employee_bulk_delete_past_the_guard() {
    let auth = MockAuth::hr(2);
    let (id_name, id_value) = auth.user_id_header();
    let (role_name, role_value) = auth.user_role_header();

    let response = server()
        .post("/employees/bulk-delete")
        .add_header(id_name, id_value)
        .add_header(role_name, role_value)
        .json(&serde_json::json!({ "ids": [] }))
        .await;

    // The handler runs and fails only on the missing database.
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<serde_json::Value>()["kind"], "INTERNAL");
}

#[tokio::test]
async fn should_reject_requests_without_identity() {
    server()
        .get("/employees")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_answer_liveness_without_identity() {
    let response = server().get("/healthz").await;
    response.assert_status_ok();
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    server()
        .get("/readyz")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
