//! # 时间记录实体定义
//!
//! 时间记录表的 Sea-ORM 实体模型

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 时间记录实体
///
/// `timestamp` 始终保存为 UTC 的 ISO-8601 字符串，既是存储格式也是排序键。
/// `uuid` 与 `user_id` 在创建后不可变。
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "time_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub uuid: String,
    pub user_id: String,
    pub timestamp: String,
    pub activity: String,
    pub tag: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
