//! # 时间戳规范化
//!
//! 将各种输入格式的时间戳统一转换为 UTC 的 ISO-8601 字符串，
//! 并为日期范围查询展开闭区间边界。

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::error;

/// 无时区输入按此时区解读（墙上时钟时间，UTC+8）
pub const SOURCE_TZ: Tz = chrono_tz::Asia::Shanghai;

/// 一个将本地时间安全转换为UTC时间的工具 Trait
pub trait ConvertToUtc {
    /// 接受一个时区作为参数，返回一个UTC的DateTime
    fn to_utc(&self, tz: &Tz) -> Option<DateTime<Utc>>;
}

impl ConvertToUtc for NaiveDateTime {
    fn to_utc(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        // 使用 .single() 来安全处理夏令时切换等边界情况
        tz.from_local_datetime(self)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// 将输入时间戳规范化为 UTC 的 ISO-8601 字符串
///
/// 接受三种输入形态：
/// - 以 `Z` 结尾或携带显式偏移的 ISO-8601 字符串（直接转换为 UTC）；
/// - 无偏移的 ISO-8601 字符串（按 [`SOURCE_TZ`] 墙上时间解读）；
/// - `YYYY-MM-DD HH:MM:SS` 格式（同样按 [`SOURCE_TZ`] 解读）。
///
/// 无法识别的输入不会报错，而是原样返回（与既有数据兼容的宽容回退；
/// 调用方需要意识到此时存储值可能不是规范格式）。
#[must_use]
pub fn normalize(input: &str) -> String {
    // 携带 Z 或显式偏移的情况
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return dt.with_timezone(&Utc).to_rfc3339();
    }

    // 无偏移的情况，按源时区墙上时间解读
    if let Some(naive) = parse_naive_datetime(input) {
        if let Some(utc) = naive.to_utc(&SOURCE_TZ) {
            return utc.to_rfc3339();
        }
    }

    error!("无效的时间戳格式: {input}");
    input.to_string()
}

/// 安全地解析无偏移的时间字符串
fn parse_naive_datetime(input: &str) -> Option<NaiveDateTime> {
    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    for format in &datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Some(dt);
        }
    }

    None
}

/// 将日历日期范围展开为 UTC 闭区间边界
///
/// 开始日期展开为 `00:00:00`，结束日期展开为 `23:59:59`，再经过
/// [`normalize`] 转换，可直接用于
/// `timestamp >= lo AND timestamp <= hi` 的范围谓词。
#[must_use]
pub fn range_bounds(start_date: &str, end_date: &str) -> (String, String) {
    let lo = normalize(&format!("{start_date} 00:00:00"));
    let hi = normalize(&format!("{end_date} 23:59:59"));
    (lo, hi)
}
