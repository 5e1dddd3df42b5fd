//! # 配置管理模块
//!
//! 处理应用配置加载和验证

mod app_config;

pub use app_config::{AppConfig, AuthConfig, DatabaseConfig, ServerConfig};

use std::env;
use std::path::Path;

/// 加载配置文件
///
/// 路径优先取 `TIME_LOGGER_CONFIG_PATH` 环境变量，否则为 `config/config.toml`。
pub fn load_config() -> crate::error::Result<AppConfig> {
    let config_file = env::var("TIME_LOGGER_CONFIG_PATH")
        .unwrap_or_else(|_| "config/config.toml".to_string());

    if !Path::new(&config_file).exists() {
        return Err(crate::error::AppError::config(format!(
            "配置文件不存在: {config_file}"
        )));
    }

    let config_content = std::fs::read_to_string(&config_file).map_err(|e| {
        crate::error::AppError::config_with_source(format!("读取配置文件失败: {config_file}"), e)
    })?;

    let config: AppConfig = toml::from_str(&config_content)?;

    validate_config(&config)?;

    Ok(config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> crate::error::Result<()> {
    if config.server.port == 0 {
        return Err(crate::error::AppError::config(format!(
            "无效的服务器端口: {}",
            config.server.port
        )));
    }

    if config.database.url.is_empty() {
        return Err(crate::error::AppError::config("数据库URL不能为空"));
    }

    if config.auth.client_id.is_empty() || config.auth.client_secret.is_empty() {
        return Err(crate::error::AppError::config(
            "身份提供商 client_id/client_secret 不能为空",
        ));
    }

    for endpoint in [
        &config.auth.authorize_endpoint,
        &config.auth.token_endpoint,
        &config.auth.userinfo_endpoint,
        &config.auth.redirect_uri,
    ] {
        url::Url::parse(endpoint).map_err(|e| {
            crate::error::AppError::config(format!("无效的身份提供商URL {endpoint}: {e}"))
        })?;
    }

    if config.auth.state_ttl_seconds == 0 || config.auth.sweep_interval_seconds == 0 {
        return Err(crate::error::AppError::config(
            "state_ttl_seconds 和 sweep_interval_seconds 必须大于 0",
        ));
    }

    Ok(())
}
