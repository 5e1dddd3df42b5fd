//! 身份提供商客户端的集成测试

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use time_logger::auth::IdentityProvider;
use time_logger::config::AuthConfig;
use time_logger::error::AppError;

fn config_for(idp: &MockServer) -> AuthConfig {
    AuthConfig {
        client_id: "app-id".to_string(),
        client_secret: "app-secret".to_string(),
        authorize_endpoint: format!("{}/login/oauth/authorize", idp.uri()),
        token_endpoint: format!("{}/api/login/oauth/access_token", idp.uri()),
        userinfo_endpoint: format!("{}/api/userinfo", idp.uri()),
        redirect_uri: "https://timelogger.example.com/callback".to_string(),
        state_ttl_seconds: 300,
        sweep_interval_seconds: 60,
    }
}

#[tokio::test]
async fn exchange_code_posts_form_and_parses_tokens() {
    let idp = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login/oauth/access_token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the-code"))
        .and(body_string_contains("client_id=app-id"))
        .and(body_string_contains("client_secret=app-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "at",
            "refresh_token": "rt",
            "id_token": "idt",
            "scope": "read",
            "token_type": "Bearer",
            "expires_in": 3600,
        })))
        .mount(&idp)
        .await;

    let provider = IdentityProvider::new(config_for(&idp));
    let tokens = provider.exchange_code("the-code").await.unwrap();

    assert_eq!(tokens.access_token, "at");
    assert_eq!(tokens.expires_in, 3600);
}

#[tokio::test]
async fn rejected_code_is_an_upstream_error() {
    let idp = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login/oauth/access_token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
        .mount(&idp)
        .await;

    let provider = IdentityProvider::new(config_for(&idp));
    let err = provider.exchange_code("bad-code").await.unwrap_err();

    assert!(matches!(err, AppError::Upstream { .. }));
}

#[tokio::test]
async fn user_info_sends_bearer_token() {
    let idp = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/userinfo"))
        .and(header("authorization", "Bearer at-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u-1",
            "name": "Alice",
            "email": "alice@example.com",
        })))
        .mount(&idp)
        .await;

    let provider = IdentityProvider::new(config_for(&idp));
    let user = provider.fetch_user_info("at-123").await.unwrap();

    assert_eq!(user.id, "u-1");
    // 提供商未返回的可选字段回退为空串
    assert_eq!(user.email_verified_at, "");
}

#[tokio::test]
async fn rejected_token_is_an_authentication_error() {
    let idp = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/userinfo"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&idp)
        .await;

    let provider = IdentityProvider::new(config_for(&idp));
    let err = provider.fetch_user_info("expired").await.unwrap_err();

    assert!(matches!(err, AppError::Authentication { .. }));
}
