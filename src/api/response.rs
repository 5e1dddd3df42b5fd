//! # API 响应结构
//!
//! 成功响应的 JSON 形状。错误统一由 `AppError` 的
//! `IntoResponse` 转换为 `{"detail": "..."}`。

use serde::{Deserialize, Serialize};

/// 带消息的操作结果
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 创建成功的结果，附带新记录ID
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub id: String,
}

impl CreatedResponse {
    #[must_use]
    pub fn new(message: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            id: id.into(),
        }
    }
}
