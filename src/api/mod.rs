//! # HTTP API 模块
//!
//! Axum 服务器、路由和请求处理器

pub mod handlers;
pub mod response;
pub mod routes;
pub mod server;

pub use server::{ApiServer, AppContext, AppState};

use crate::error::{AppError, Result};
use std::future::Future;
use std::time::Duration;

/// 在时间预算内执行处理逻辑
///
/// 超时后放弃操作并报告请求级失败；持久化写入都是单条语句，
/// 不会留下部分提交的状态。
pub(crate) async fn with_request_timeout<T>(
    budget: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => Err(AppError::timeout("处理超出时间预算，操作已放弃")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_inner_result_within_budget() {
        let result = with_request_timeout(Duration::from_secs(1), async { Ok(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn reports_timeout_when_budget_exceeded() {
        let result = with_request_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(AppError::Timeout { .. })));
    }
}
