//! # Entity 模块
//!
//! 包含所有 Sea-ORM 实体定义

pub mod time_logs;

pub use time_logs::Entity as TimeLogs;
