//! # API 服务器
//!
//! Axum HTTP服务器，提供时间记录和认证API，并托管前端静态文件

use crate::auth::provider::IdentityProvider;
use crate::auth::state::AuthStateStore;
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use axum::Router;
use axum::routing::get;
use sea_orm::DatabaseConnection;
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// 应用上下文，持有所有共享组件
///
/// 数据库连接池在进程启动时创建一次，按请求取用连接，
/// 不存在模块级全局连接。
pub struct AppContext {
    /// 应用配置
    pub config: AppConfig,
    /// 数据库连接池
    pub database: DatabaseConnection,
    /// 身份提供商客户端
    pub provider: IdentityProvider,
    /// 授权 state 存储
    pub auth_states: Arc<AuthStateStore>,
}

impl AppContext {
    #[must_use]
    pub fn new(config: AppConfig, database: DatabaseConnection) -> Self {
        let provider = IdentityProvider::new(config.auth.clone());
        let auth_states = Arc::new(AuthStateStore::new(config.auth.state_ttl_seconds));
        Self {
            config,
            database,
            provider,
            auth_states,
        }
    }
}

/// API服务器应用状态
#[derive(Clone)]
pub struct AppState {
    context: Arc<AppContext>,
}

impl AppState {
    #[must_use]
    pub const fn new(context: Arc<AppContext>) -> Self {
        Self { context }
    }

    #[must_use]
    pub fn provider(&self) -> &IdentityProvider {
        &self.context.provider
    }

    #[must_use]
    pub fn auth_states(&self) -> &Arc<AuthStateStore> {
        &self.context.auth_states
    }

    /// 单个请求的时间预算
    #[must_use]
    pub fn request_budget(&self) -> Duration {
        Duration::from_secs(self.context.config.server.request_timeout)
    }
}

impl Deref for AppState {
    type Target = AppContext;

    fn deref(&self) -> &Self::Target {
        &self.context
    }
}

/// API服务器
pub struct ApiServer {
    bind_address: String,
    port: u16,
    router: Router,
}

impl ApiServer {
    /// 创建新的API服务器
    pub fn new(context: Arc<AppContext>) -> Result<Self> {
        let state = AppState::new(context);
        let bind_address = state.config.server.bind_address.clone();
        let port = state.config.server.port;
        let router = Self::create_router(state)?;

        Ok(Self {
            bind_address,
            port,
            router,
        })
    }

    /// 创建路由器
    fn create_router(state: AppState) -> Result<Router> {
        let config = state.config.server.clone();
        let api_routes = super::routes::create_routes(state);

        // 静态文件服务配置，支持SPA应用的fallback
        let static_dir = std::path::Path::new(&config.static_dir);
        let static_service = if static_dir.exists() {
            info!("启用静态文件服务: {}", static_dir.display());
            let index_file = static_dir.join("index.html");
            Some(ServeDir::new(static_dir).not_found_service(ServeFile::new(index_file)))
        } else {
            warn!(
                "静态文件目录 {} 不存在，前端页面将不可用",
                static_dir.display()
            );
            None
        };

        let mut app = Router::new()
            .nest("/api", api_routes)
            .route("/ping", get(super::handlers::system::ping_handler));

        if let Some(service) = static_service {
            app = app.fallback_service(service);
        }

        // 配置CORS
        let mut cors_layer = CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
                axum::http::header::ORIGIN,
            ]);

        if config.cors_origins.contains(&"*".to_string()) {
            cors_layer = cors_layer.allow_origin(Any);
        } else {
            let origins = config
                .cors_origins
                .iter()
                .map(|origin| origin.parse::<axum::http::HeaderValue>())
                .collect::<std::result::Result<Vec<_>, _>>();

            match origins {
                Ok(origins) => {
                    cors_layer = cors_layer.allow_origin(origins);
                }
                Err(e) => {
                    warn!("无效的CORS源配置: {e}, 回退为允许任意源");
                    cors_layer = cors_layer.allow_origin(Any);
                }
            }
        }

        let app = app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer),
        );

        Ok(app)
    }

    /// 启动服务器，`shutdown` 取消时优雅退出
    pub async fn serve(self, shutdown: CancellationToken) -> Result<()> {
        let ip = self
            .bind_address
            .parse::<std::net::IpAddr>()
            .map_err(|e| {
                AppError::config(format!("无效的监听地址 '{}': {e}", self.bind_address))
            })?;
        let addr = SocketAddr::new(ip, self.port);

        info!("API服务器监听于 {addr}");

        let listener = TcpListener::bind(&addr).await?;

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(|e| AppError::internal(format!("API服务器错误: {e}")))?;

        Ok(())
    }
}
