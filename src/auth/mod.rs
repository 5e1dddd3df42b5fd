//! # 认证模块
//!
//! OAuth2 授权码流程、anti-CSRF state 管理与请求级身份解析

pub mod cleanup_task;
pub mod extractor;
pub mod provider;
pub mod state;

pub use cleanup_task::StateCleanupTask;
pub use extractor::CurrentUser;
pub use provider::{IdentityProvider, TokenResponse, UserIdentity};
pub use state::{AuthStateStats, AuthStateStore};
