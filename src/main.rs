//! # TimeLogger 主程序
//!
//! 个人时间记录服务 - 时间戳+描述+标签

use std::sync::Arc;
use time_logger::api::{ApiServer, AppContext};
use time_logger::auth::StateCleanupTask;
use time_logger::error::Result;
use time_logger::{config, database, logging};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志系统
    logging::init_logging(None);

    info!("TimeLogger启动中...");

    let app_config = config::load_config()?;

    // 初始化数据库连接并执行迁移
    let db = database::init_database(&app_config.database.url).await?;
    database::run_migrations(&db).await?;

    let context = Arc::new(AppContext::new(app_config, db));

    // 启动后台 state 清理任务，进程关闭时随取消令牌退出
    let shutdown = CancellationToken::new();
    let cleanup_task = StateCleanupTask::new(
        Arc::clone(&context.auth_states),
        context.config.auth.sweep_interval_seconds,
        shutdown.clone(),
    );
    tokio::spawn(cleanup_task.run());

    // Ctrl-C 触发优雅关闭
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("TimeLogger关闭中...");
            signal_shutdown.cancel();
        }
    });

    let server = ApiServer::new(context)?;
    info!("TimeLogger已启动");

    if let Err(e) = server.serve(shutdown).await {
        error!("服务启动失败: {e:?}");
        std::process::exit(1);
    }

    info!("TimeLogger已关闭");
    Ok(())
}
