//! # TimeLogger System Library
//!
//! 个人时间记录服务核心库

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, Result};
