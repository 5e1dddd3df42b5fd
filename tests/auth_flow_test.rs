//! OAuth2 授权码流程的端到端测试
//!
//! 模拟身份提供商的令牌端点，覆盖 state 的单次有效性
//! 与令牌交换失败的错误归类。

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use time_logger::api::{AppContext, AppState, routes};
use time_logger::config::{AppConfig, AuthConfig, DatabaseConfig, ServerConfig};

fn token_json() -> Value {
    json!({
        "access_token": "at-123",
        "refresh_token": "rt-123",
        "id_token": "idt-123",
        "scope": "read",
        "token_type": "Bearer",
        "expires_in": 3600,
    })
}

async fn setup(idp: &MockServer) -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let config = AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
        },
        auth: AuthConfig {
            client_id: "app-id".to_string(),
            client_secret: "app-secret".to_string(),
            authorize_endpoint: format!("{}/login/oauth/authorize", idp.uri()),
            token_endpoint: format!("{}/api/login/oauth/access_token", idp.uri()),
            userinfo_endpoint: format!("{}/api/userinfo", idp.uri()),
            redirect_uri: "https://timelogger.example.com/callback".to_string(),
            state_ttl_seconds: 300,
            sweep_interval_seconds: 60,
        },
    };

    let context = Arc::new(AppContext::new(config, db));
    Router::new().nest("/api", routes::create_routes(AppState::new(context)))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, value)
}

/// 发起登录并从授权URL中取出 state
async fn initiate_login(app: &Router) -> String {
    let request = Request::post("/api/auth/login")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);

    let authorize_url = Url::parse(body.as_str().unwrap()).unwrap();
    authorize_url
        .query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.to_string())
        .unwrap()
}

fn callback_request(code: &str, state: &str) -> Request<Body> {
    Request::post("/api/auth/callback")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "code": code, "state": state }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn login_url_points_to_provider_with_redirect() {
    let idp = MockServer::start().await;
    let app = setup(&idp).await;

    let request = Request::post("/api/auth/login")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    let url = body.as_str().unwrap();
    assert!(url.starts_with(&format!("{}/login/oauth/authorize?", idp.uri())));
    assert!(url.contains("client_id=app-id"));
    assert!(url.contains("state="));
}

#[tokio::test]
async fn callback_with_valid_state_exchanges_code() {
    let idp = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login/oauth/access_token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json()))
        .expect(1)
        .mount(&idp)
        .await;

    let app = setup(&idp).await;
    let state = initiate_login(&app).await;

    let (status, body) = send(&app, callback_request("auth-code-1", &state)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], "at-123");
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
async fn state_is_single_use() {
    let idp = MockServer::start().await;

    // 同一个授权码绝不会被交换两次
    Mock::given(method("POST"))
        .and(path("/api/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json()))
        .expect(1)
        .mount(&idp)
        .await;

    let app = setup(&idp).await;
    let state = initiate_login(&app).await;

    let (status, _) = send(&app, callback_request("auth-code-1", &state)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, callback_request("auth-code-1", &state)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["detail"].as_str().unwrap().contains("state"));
}

#[tokio::test]
async fn unknown_state_is_rejected_without_exchange() {
    let idp = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json()))
        .expect(0)
        .mount(&idp)
        .await;

    let app = setup(&idp).await;

    let (status, _) = send(&app, callback_request("auth-code-1", "never-issued")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn provider_rejection_is_surfaced_as_upstream_error() {
    let idp = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login/oauth/access_token"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })),
        )
        .mount(&idp)
        .await;

    let app = setup(&idp).await;
    let state = initiate_login(&app).await;

    let (status, body) = send(&app, callback_request("stale-code", &state)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["detail"].as_str().unwrap().contains("令牌交换失败"));
}

#[tokio::test]
async fn user_info_echoes_identity() {
    let idp = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/userinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "alice",
            "name": "Alice",
            "email": "alice@example.com",
            "email_verified_at": "2024-01-01T00:00:00+00:00",
            "created_at": "2024-01-01T00:00:00+00:00",
            "updated_at": "2024-01-01T00:00:00+00:00",
        })))
        .mount(&idp)
        .await;

    let app = setup(&idp).await;

    let request = Request::get("/api/auth/user_info")
        .header(header::AUTHORIZATION, "Bearer at-123")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "alice");
    assert_eq!(body["email"], "alice@example.com");
}
