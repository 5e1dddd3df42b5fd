//! # 路由配置
//!
//! 定义所有API路由和路由组织

use crate::api::server::AppState;
use axum::Router;
use axum::routing::{get, post};

/// 创建所有路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // 认证路由（login/callback 不要求已有身份）
        .nest("/auth", auth_routes())
        // 时间记录路由
        .nest("/timelogs", timelog_routes())
        .with_state(state)
}

/// 认证路由
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(crate::api::handlers::auth::login))
        .route("/callback", post(crate::api::handlers::auth::callback))
        .route("/user_info", get(crate::api::handlers::auth::user_info))
}

/// 时间记录路由
fn timelog_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(crate::api::handlers::timelogs::list_timelogs)
                .post(crate::api::handlers::timelogs::create_timelog)
                .put(crate::api::handlers::timelogs::update_timelog)
                .delete(crate::api::handlers::timelogs::delete_timelog),
        )
        .route(
            "/export",
            get(crate::api::handlers::timelogs::export_timelogs),
        )
}
