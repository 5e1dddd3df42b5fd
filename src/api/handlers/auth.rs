//! # 认证处理器
//!
//! OAuth2 授权码流程的对外端点：发起登录、处理回调、回显当前用户。

use crate::api::server::AppState;
use crate::api::with_request_timeout;
use crate::auth::CurrentUser;
use crate::auth::provider::{TokenResponse, UserIdentity};
use crate::error::{AppError, Result};
use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use tracing::{info, warn};

/// 回调请求体
#[derive(Debug, Deserialize)]
pub struct CallbackRequest {
    pub code: String,
    pub state: String,
}

/// 发起登录流程
///
/// 登记一个新的 state 并返回指向身份提供商授权端点的跳转URL。
pub async fn login(State(state): State<AppState>) -> Result<Json<String>> {
    let token = state.auth_states().issue();
    let url = state.provider().build_authorize_url(&token)?;

    info!("发起登录流程, state={token}");
    Ok(Json(url))
}

/// 处理身份提供商回调
///
/// state 必须命中已登记且未过期的条目，命中即消费删除；
/// 随后用授权码向提供商换取令牌。授权码单次有效，交换失败不重试。
pub async fn callback(
    State(state): State<AppState>,
    Json(request): Json<CallbackRequest>,
) -> Result<Json<TokenResponse>> {
    with_request_timeout(state.request_budget(), async {
        if request.code.is_empty() {
            return Err(AppError::validation("授权码不能为空"));
        }

        if !state.auth_states().consume(&request.state) {
            warn!("回调携带未知或过期的 state: {}", request.state);
            return Err(AppError::authentication("无效或过期的 state"));
        }

        let tokens = state.provider().exchange_code(&request.code).await?;

        info!("令牌交换成功, state={}", request.state);
        Ok(Json(tokens))
    })
    .await
}

/// 回显当前用户信息
pub async fn user_info(CurrentUser(user): CurrentUser) -> Json<UserIdentity> {
    Json(user)
}
