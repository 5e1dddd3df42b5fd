//! # 时间记录处理器
//!
//! 时间记录的增删改查与CSV导出。所有操作都以调用方身份为界：
//! 记录不存在与属于他人统一返回 404，不泄露存在性。

use crate::api::response::{CreatedResponse, MessageResponse};
use crate::api::server::AppState;
use crate::api::with_request_timeout;
use crate::auth::CurrentUser;
use crate::error::{AppError, Result};
use crate::types::timestamp::{normalize, range_bounds};
use axum::Json;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::NaiveDate;
use entity::time_logs::{self, Entity as TimeLogs};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 日期范围查询参数
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// 开始日期，格式为YYYY-MM-DD
    pub start_date: String,
    /// 结束日期，格式为YYYY-MM-DD
    pub end_date: String,
}

/// 按记录ID定位的查询参数
#[derive(Debug, Deserialize)]
pub struct UuidQuery {
    pub uuid: String,
}

/// 创建/更新时间记录的请求体
#[derive(Debug, Deserialize)]
pub struct TimelogRequest {
    pub timestamp: String,
    pub activity: String,
    pub tag: Option<String>,
}

/// 时间记录响应
#[derive(Debug, Serialize)]
pub struct TimelogResponse {
    pub uuid: String,
    pub user_id: String,
    pub timestamp: String,
    pub activity: String,
    pub tag: Option<String>,
}

impl From<time_logs::Model> for TimelogResponse {
    fn from(model: time_logs::Model) -> Self {
        Self {
            uuid: model.uuid,
            user_id: model.user_id,
            timestamp: model.timestamp,
            activity: model.activity,
            tag: model.tag,
        }
    }
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("{field} 必须为 YYYY-MM-DD 格式: {value}")))
}

fn validate_request(request: &TimelogRequest) -> Result<()> {
    if request.activity.trim().is_empty() {
        return Err(AppError::validation("activity 不能为空"));
    }
    Ok(())
}

/// 获取指定日期范围内的时间记录，按时间升序返回
pub async fn list_timelogs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<TimelogResponse>>> {
    with_request_timeout(state.request_budget(), async {
        parse_date(&query.start_date, "start_date")?;
        parse_date(&query.end_date, "end_date")?;

        let (lo, hi) = range_bounds(&query.start_date, &query.end_date);

        let rows = TimeLogs::find()
            .filter(time_logs::Column::UserId.eq(user.id.as_str()))
            .filter(time_logs::Column::Timestamp.gte(lo))
            .filter(time_logs::Column::Timestamp.lte(hi))
            .order_by_asc(time_logs::Column::Timestamp)
            .all(&state.database)
            .await?;

        Ok(Json(rows.into_iter().map(TimelogResponse::from).collect()))
    })
    .await
}

/// 创建新的时间记录
pub async fn create_timelog(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<TimelogRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    with_request_timeout(state.request_budget(), async {
        validate_request(&request)?;

        let new_uuid = uuid::Uuid::new_v4().to_string();
        let record = time_logs::ActiveModel {
            uuid: Set(new_uuid.clone()),
            user_id: Set(user.id),
            timestamp: Set(normalize(&request.timestamp)),
            activity: Set(request.activity),
            tag: Set(request.tag),
        };
        record.insert(&state.database).await?;

        info!("时间记录创建成功: {new_uuid}");
        Ok((
            StatusCode::CREATED,
            Json(CreatedResponse::new("时间记录创建成功", new_uuid)),
        ))
    })
    .await
}

/// 更新时间记录（仅限记录拥有者）
pub async fn update_timelog(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<UuidQuery>,
    Json(request): Json<TimelogRequest>,
) -> Result<Json<MessageResponse>> {
    with_request_timeout(state.request_budget(), async {
        validate_request(&request)?;

        let existing = TimeLogs::find()
            .filter(time_logs::Column::Uuid.eq(query.uuid.as_str()))
            .filter(time_logs::Column::UserId.eq(user.id.as_str()))
            .one(&state.database)
            .await?
            .ok_or_else(|| AppError::not_found("找不到指定的时间记录或无权限更新"))?;

        let mut record: time_logs::ActiveModel = existing.into();
        record.timestamp = Set(normalize(&request.timestamp));
        record.activity = Set(request.activity);
        record.tag = Set(request.tag);
        record.update(&state.database).await?;

        Ok(Json(MessageResponse::new("时间记录更新成功")))
    })
    .await
}

/// 删除时间记录（仅限记录拥有者）
pub async fn delete_timelog(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<UuidQuery>,
) -> Result<Json<MessageResponse>> {
    with_request_timeout(state.request_budget(), async {
        let result = TimeLogs::delete_many()
            .filter(time_logs::Column::Uuid.eq(query.uuid.as_str()))
            .filter(time_logs::Column::UserId.eq(user.id.as_str()))
            .exec(&state.database)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("找不到指定的时间记录或无权限删除"));
        }

        Ok(Json(MessageResponse::new("时间记录删除成功")))
    })
    .await
}

/// 导出调用方的全部时间记录为CSV文件
pub async fn export_timelogs(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse> {
    with_request_timeout(state.request_budget(), async {
        let rows = TimeLogs::find()
            .filter(time_logs::Column::UserId.eq(user.id.as_str()))
            .order_by_asc(time_logs::Column::Timestamp)
            .all(&state.database)
            .await?;

        let body = write_csv(&rows)?;

        Ok((
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"timelogs.csv\"",
                ),
            ],
            body,
        ))
    })
    .await
}

fn write_csv(rows: &[time_logs::Model]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["uuid", "timestamp", "activity", "tag"])
        .map_err(|e| AppError::internal(format!("CSV写入失败: {e}")))?;

    for row in rows {
        writer
            .write_record([
                row.uuid.as_str(),
                row.timestamp.as_str(),
                row.activity.as_str(),
                row.tag.as_deref().unwrap_or(""),
            ])
            .map_err(|e| AppError::internal(format!("CSV写入失败: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV写入失败: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(uuid: &str, timestamp: &str, activity: &str, tag: Option<&str>) -> time_logs::Model {
        time_logs::Model {
            uuid: uuid.to_string(),
            user_id: "user-1".to_string(),
            timestamp: timestamp.to_string(),
            activity: activity.to_string(),
            tag: tag.map(str::to_string),
        }
    }

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let rows = vec![
            model("a1", "2024-01-01T02:00:00+00:00", "写代码", Some("工作")),
            model("a2", "2024-01-01T03:00:00+00:00", "午饭", None),
        ];

        let bytes = write_csv(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "uuid,timestamp,activity,tag");
        assert_eq!(lines[1], "a1,2024-01-01T02:00:00+00:00,写代码,工作");
        assert_eq!(lines[2], "a2,2024-01-01T03:00:00+00:00,午饭,");
    }

    #[test]
    fn blank_activity_is_rejected() {
        let request = TimelogRequest {
            timestamp: "2024-01-01 10:00:00".to_string(),
            activity: "   ".to_string(),
            tag: None,
        };
        assert!(validate_request(&request).is_err());
    }

    #[test]
    fn date_validation_rejects_garbage() {
        assert!(parse_date("2024-01-01", "start_date").is_ok());
        assert!(parse_date("01/02/2024", "start_date").is_err());
        assert!(parse_date("yesterday", "end_date").is_err());
    }
}
