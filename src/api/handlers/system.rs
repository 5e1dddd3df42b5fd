//! # 系统处理器

use axum::Json;
use serde_json::{Value, json};

/// 存活探测
pub async fn ping_handler() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}
