// ==========================================
// 电视广告投放计划系统 - 计划配置项
// ==========================================
// 两个开放问题以显式配置表达，不在代码里静默选边:
// - 毛价公式是否乘以素材时长 (pricing/include_clip_duration)
// - 删除波段最后一条明细时是否级联删除波段 (wave/cascade_delete_on_last_item)
// ==========================================

use crate::domain::types::GrpFormulaSelection;
use serde::{Deserialize, Serialize};

/// 配置键
pub mod config_keys {
    pub const GRP_FORMULA: &str = "pricing/grp_formula";
    pub const INCLUDE_CLIP_DURATION: &str = "pricing/include_clip_duration";
    pub const CASCADE_DELETE_ON_LAST_ITEM: &str = "wave/cascade_delete_on_last_item";
    pub const TRP_ROUNDING_DECIMALS: &str = "trp/rounding_decimals";
}

// ==========================================
// PricingConfig - 计价配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub grp_formula: GrpFormulaSelection,
    /// 默认 true：毛价 = trp × gross_cpp × clip_duration × ∏指数
    pub include_clip_duration: bool,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            grp_formula: GrpFormulaSelection::Auto,
            include_clip_duration: true,
        }
    }
}

// ==========================================
// PlannerConfig - 全量配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub pricing: PricingConfig,
    /// 默认 true（沿用既有行为）
    pub cascade_delete_empty_wave: bool,
    /// TRP 日值保留小数位，默认 2
    pub trp_rounding_decimals: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            cascade_delete_empty_wave: true,
            trp_rounding_decimals: 2,
        }
    }
}

/// 解析布尔配置值（true/false/1/0/yes/no），无法识别返回 None
pub fn parse_bool_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
