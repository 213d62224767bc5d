//! Integration tests for the web host: health probes, session login and request logs.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use rosterd::config::Config;
use rosterd::db::Store;
use rosterd::services::Startup;
use tower::ServiceExt;

async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.security.argon2_memory_cost_kib = 64;
    config.security.argon2_time_cost = 1;

    let store = Store::new(&config.general.database_path)
        .await
        .expect("Failed to open in-memory database");

    Startup::from_store(&store, &config)
        .migrate()
        .await
        .expect("Failed to migrate");

    rosterd::api::router(rosterd::api::create_app_state(config, store))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn login_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "email": email, "password": password }).to_string(),
        ))
        .unwrap()
}

/// Logs in and returns the session cookie pair.
async fn login(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(login_request(email, "p@55wOrd"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login should set a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_live() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "alive");
}

#[tokio::test]
async fn test_health_ready() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["ready"], true);
    assert_eq!(body["data"]["checks"]["database"], true);
}

#[tokio::test]
async fn test_seeded_admin_can_log_in() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(login_request("admin@email.com", "p@55wOrd"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["success"].as_bool().unwrap());
    assert_eq!(body["data"]["display_name"], "Admin User");
    assert_eq!(
        body["data"]["roles"],
        serde_json::json!(["Admin", "Employee", "Manager"])
    );
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let app = spawn_app().await;

    let response = app
        .oneshot(login_request("manager@email.com", "wrong"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_requires_session() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let cookie = login(&app, "employee@email.com").await;
    let response = app
        .oneshot(get_with_cookie("/api/auth/me", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["email"], "employee@email.com");
    assert_eq!(body["data"]["roles"], serde_json::json!(["Employee"]));
}

#[tokio::test]
async fn test_request_logs_visible_to_admin() {
    let app = spawn_app().await;
    let cookie = login(&app, "admin@email.com").await;

    let response = app
        .oneshot(get_with_cookie("/api/request-logs?limit=10", &cookie))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let logs = body["data"].as_array().unwrap();
    assert!(!logs.is_empty());
    assert!(logs.iter().any(|log| log["path"] == "/api/auth/login"
        && log["method"] == "POST"
        && log["user_email"] == "admin@email.com"));
}

#[tokio::test]
async fn test_request_logs_forbidden_without_admin_role() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/request-logs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let cookie = login(&app, "manager@email.com").await;
    let response = app
        .oneshot(get_with_cookie("/api/request-logs", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
