// ==========================================
// 电视广告投放计划系统 - 指数目录领域模型
// ==========================================
// 目录为只读为主的参考数据：时长指数 / 季节指数 / 位置指数 / 价目表
// ==========================================

use crate::domain::types::{IndexScope, PositionType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationIndexEntry {
    pub scope: IndexScope,
    pub duration_seconds: i32,
    pub index_value: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalIndexEntry {
    pub scope: IndexScope,
    pub month: u32, // 1-12
    pub index_value: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionIndexEntry {
    pub scope: IndexScope,
    pub position_type: PositionType,
    pub index_value: f64,
    pub description: Option<String>,
}

/// 价目表条目
///
/// 按 (频道组, 目标受众) 记录协商的份额与每秒基价（gross_cpp）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCardEntry {
    pub channel_group: String,
    pub target_group: String,
    pub gross_cpp: f64,
    pub channel_share: Option<f64>,
    pub pt_zone_share: Option<f64>,
    pub npt_zone_share: Option<f64>,
    pub description: Option<String>,
}

// ==========================================
// ResolvedIndices - 波段指数解析结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedIndices {
    pub duration_index: f64,
    pub seasonal_index: f64,
    pub position_index: f64,
    /// 各项是否命中目录（false = 使用了默认值）
    pub duration_from_catalog: bool,
    pub seasonal_from_catalog: bool,
    pub position_from_catalog: bool,
}

/// 标准时长档位 (起始秒, 结束秒(含), 指数, 描述)
///
/// 45 秒及以上统一为一档
pub const DEFAULT_DURATION_BRACKETS: &[(i32, i32, f64, &str)] = &[
    (5, 9, 1.35, "5\"-9\""),
    (10, 14, 1.25, "10\"-14\""),
    (15, 19, 1.2, "15\"-19\""),
    (20, 24, 1.15, "20\"-24\""),
    (25, 29, 1.1, "25\"-29\""),
    (30, 44, 1.0, "30\"-44\""),
    (45, 300, 1.0, "≥45\""),
];

/// 时长所在档位描述
pub fn duration_bracket_label(duration_seconds: i32) -> Option<&'static str> {
    DEFAULT_DURATION_BRACKETS
        .iter()
        .find(|(from, to, _, _)| duration_seconds >= *from && duration_seconds <= *to)
        .map(|(_, _, _, label)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_bracket_label() {
        assert_eq!(duration_bracket_label(5), Some("5\"-9\""));
        assert_eq!(duration_bracket_label(14), Some("10\"-14\""));
        assert_eq!(duration_bracket_label(60), Some("≥45\""));
        assert_eq!(duration_bracket_label(3), None);
    }
}
