//! # 应用配置结构定义

use serde::{Deserialize, Serialize};

/// 应用主配置结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP 服务器配置
    pub server: ServerConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 身份提供商（OAuth2）配置
    pub auth: AuthConfig,
}

/// HTTP 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    pub bind_address: String,
    /// 监听端口
    pub port: u16,
    /// 允许的CORS源地址
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// 前端静态文件目录
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// 单个请求的时间预算（秒）
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库连接URL
    pub url: String,
}

/// 身份提供商（OAuth2 授权码模式）配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// 客户端ID
    pub client_id: String,
    /// 客户端密钥
    pub client_secret: String,
    /// 授权端点
    pub authorize_endpoint: String,
    /// 令牌端点
    pub token_endpoint: String,
    /// 用户信息端点
    pub userinfo_endpoint: String,
    /// 回调地址
    pub redirect_uri: String,
    /// state 的有效期（秒）
    #[serde(default = "default_state_ttl")]
    pub state_ttl_seconds: u64,
    /// 过期 state 清理间隔（秒）
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_static_dir() -> String {
    "dist".to_string()
}

const fn default_request_timeout() -> u64 {
    10
}

const fn default_state_ttl() -> u64 {
    300
}

const fn default_sweep_interval() -> u64 {
    60
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: default_cors_origins(),
            static_dir: default_static_dir(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/timelogger.db".to_string(),
        }
    }
}
