// ==========================================
// 计价输入：默认值 / 宽松解析 / 折扣钳制
// ==========================================

/// 通用乘数默认值（位置、网络、预付款、忠诚度等指数）
pub const DEFAULT_MULTIPLIER: f64 = 1.0;
pub const DEFAULT_DURATION_INDEX: f64 = 1.25;
pub const DEFAULT_SEASONAL_INDEX: f64 = 0.9;
pub const DEFAULT_TRP_PURCHASE_INDEX: f64 = 0.95;
pub const DEFAULT_ADVANCE_PURCHASE_INDEX: f64 = 0.95;
pub const DEFAULT_CHANNEL_SHARE: f64 = 0.75;
pub const DEFAULT_PT_ZONE_SHARE: f64 = 0.55;
pub const DEFAULT_NPT_ZONE_SHARE: f64 = 0.45;
/// 素材时长默认值（秒）
pub const DEFAULT_CLIP_DURATION: f64 = 10.0;

/// 取有效值：缺失或非有限数（NaN/∞）时使用默认值
///
/// 显式给出的 0 保持为 0
pub(crate) fn value_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => default,
    }
}

/// 折扣百分比钳制到 [0, 100]；缺失或 NaN 视为 0
pub fn clamp_discount(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// 宽松解析表单数值
///
/// - 去除 `€`、`%`、空白（含不间断空格）
/// - `,` 视为小数点
/// - 空串或无法解析 → None
pub fn parse_lenient(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '€' | '%') && !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
