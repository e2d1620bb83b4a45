// ==========================================
// 电视广告投放计划系统 - 行映射辅助
// ==========================================
// 日期统一以 TEXT "YYYY-MM-DD" 存储
// ==========================================

use chrono::NaiveDate;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 宽松解析可空日期列；格式不符视为缺失
pub(crate) fn parse_date_opt(raw: Option<String>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok())
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn format_date_opt(date: Option<NaiveDate>) -> Option<String> {
    date.map(format_date)
}
