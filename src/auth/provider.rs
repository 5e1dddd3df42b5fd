//! # 身份提供商客户端
//!
//! 与 Casdoor 风格的外部身份提供商交互：构造授权URL、
//! 授权码换取令牌、以及按 Bearer 令牌解析用户身份。

use crate::config::AuthConfig;
use crate::error::{AppError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// 令牌端点的响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub id_token: String,
    pub scope: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// 按请求临时解析出的用户身份，本系统不持久化
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub email_verified_at: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

/// 身份提供商客户端
pub struct IdentityProvider {
    /// HTTP客户端
    http_client: Client,
    config: AuthConfig,
}

impl IdentityProvider {
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self {
            http_client: Client::new(),
            config,
        }
    }

    /// 生成授权URL，嵌入 state 和本服务的回调地址
    pub fn build_authorize_url(&self, state: &str) -> Result<String> {
        let mut authorize_url = Url::parse(&self.config.authorize_endpoint)
            .map_err(|e| AppError::config(format!("无效的授权URL: {e}")))?;

        authorize_url.query_pairs_mut().extend_pairs([
            ("response_type", "code"),
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("scope", "read"),
            ("state", state),
        ]);

        Ok(authorize_url.to_string())
    }

    /// 使用授权码获取访问令牌
    ///
    /// 授权码单次有效，失败不重试，直接向调用方报告。
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let mut params = HashMap::new();
        params.insert("grant_type", "authorization_code");
        params.insert("code", code);
        params.insert("redirect_uri", self.config.redirect_uri.as_str());
        params.insert("client_id", self.config.client_id.as_str());
        params.insert("client_secret", self.config.client_secret.as_str());

        let response = self
            .http_client
            .post(&self.config.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::upstream_with_source(format!("令牌请求失败: {e}"), e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::upstream_with_source(format!("响应读取失败: {e}"), e))?;

        if !status.is_success() {
            return Err(AppError::upstream(format!(
                "令牌交换失败 ({status}): {body}"
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::upstream(format!("令牌响应解析失败: {e}")))
    }

    /// 按 Bearer 令牌获取用户信息
    ///
    /// 凭证被提供商拒绝时返回认证错误，其余失败视为上游错误。
    pub async fn fetch_user_info(&self, access_token: &str) -> Result<UserIdentity> {
        let response = self
            .http_client
            .get(&self.config.userinfo_endpoint)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::upstream_with_source(format!("用户信息请求失败: {e}"), e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(AppError::authentication("无效或过期的访问令牌"));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::upstream_with_source(format!("响应读取失败: {e}"), e))?;

        if !status.is_success() {
            return Err(AppError::upstream(format!(
                "用户信息获取失败 ({status}): {body}"
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::upstream(format!("用户信息解析失败: {e}")))
    }
}
