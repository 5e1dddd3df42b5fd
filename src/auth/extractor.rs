//! # 当前用户提取器
//!
//! 在进入业务逻辑之前，从 `Authorization: Bearer` 头解析出调用方身份。
//! 每个受保护端点都通过该提取器触达身份提供商的用户信息端点，
//! 该调用同样受请求时间预算约束，提供商卡死不会拖垮请求处理。

use crate::api::server::AppState;
use crate::api::with_request_timeout;
use crate::auth::provider::UserIdentity;
use crate::error::AppError;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

/// 已认证的当前用户
pub struct CurrentUser(pub UserIdentity);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("缺少访问令牌"))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("无效的 Authorization 头格式"))?;

        let user = with_request_timeout(
            state.request_budget(),
            state.provider().fetch_user_info(token),
        )
        .await?;
        Ok(Self(user))
    }
}
