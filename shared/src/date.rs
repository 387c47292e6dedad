//! 时间格式化模块
//!
//! 后端所有时间字段都是 RFC 3339 字符串，这里统一负责：
//! - 借阅日期 (`borrowDate`) 的生成
//! - 列表与评论中时间的展示格式

use chrono::{DateTime, NaiveDate, Utc};

/// `borrowDate` 使用的日期格式
const ISO_DATE: &str = "%Y-%m-%d";

/// 管理后台用户列表的展示格式，例如 `02 Jan 2024, 10:30`
const CREATED_AT_FORMAT: &str = "%d %b %Y, %H:%M";

/// 评论时间的展示格式，例如 `02/01/2024 10:30`
const REVIEW_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// 今天的 UTC 日期 (`YYYY-MM-DD`)
pub fn today_iso() -> String {
    iso_date(Utc::now().date_naive())
}

#[inline]
pub fn iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

fn parse(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 格式化用户创建时间；无法解析时原样返回
pub fn format_created_at(raw: &str) -> String {
    parse(raw)
        .map(|dt| dt.format(CREATED_AT_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// 格式化评论时间；无法解析时原样返回
pub fn format_review_time(raw: &str) -> String {
    parse(raw)
        .map(|dt| dt.format(REVIEW_TIME_FORMAT).to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(iso_date(date), "2026-03-07");
    }

    #[test]
    fn test_format_created_at() {
        assert_eq!(
            format_created_at("2024-01-02T10:30:00.000Z"),
            "02 Jan 2024, 10:30"
        );
        // 带时区偏移的时间统一转换到 UTC
        assert_eq!(
            format_created_at("2024-01-02T17:30:00+07:00"),
            "02 Jan 2024, 10:30"
        );
    }

    #[test]
    fn test_unparseable_time_is_kept() {
        assert_eq!(format_created_at("yesterday"), "yesterday");
        assert_eq!(format_review_time(""), "");
    }

    #[test]
    fn test_format_review_time() {
        assert_eq!(
            format_review_time("2025-12-31T23:05:00Z"),
            "31/12/2025 23:05"
        );
    }
}
