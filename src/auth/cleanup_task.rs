//! # state 清理任务
//!
//! 周期性删除过期的授权 state，进程关闭时随取消令牌退出。

use crate::auth::state::AuthStateStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// 过期 state 清理任务
pub struct StateCleanupTask {
    store: Arc<AuthStateStore>,
    interval: Duration,
    shutdown: CancellationToken,
}

impl StateCleanupTask {
    #[must_use]
    pub fn new(store: Arc<AuthStateStore>, interval_seconds: u64, shutdown: CancellationToken) -> Self {
        Self {
            store,
            interval: Duration::from_secs(interval_seconds),
            shutdown,
        }
    }

    /// 运行清理循环，直到进程关闭
    ///
    /// 清理错误不对外传播，只记录日志并继续下一轮。
    pub async fn run(self) {
        info!(
            "启动 state 清理任务, 清理间隔: {}s",
            self.interval.as_secs()
        );

        let mut interval = time::interval(self.interval);
        // 第一个 tick 立即完成，跳过它避免启动时空扫
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let removed = self.store.sweep_expired();
                    let stats = self.store.stats();
                    if removed > 0 {
                        info!(
                            "已清理 {removed} 个过期的授权 state, 剩余待消费: {}",
                            stats.pending
                        );
                    } else {
                        debug!("本轮没有过期的授权 state, 待消费: {}", stats.pending);
                    }
                }
                () = self.shutdown.cancelled() => {
                    info!("state 清理任务退出");
                    break;
                }
            }
        }
    }
}
