// ==========================================
// 电视广告投放计划系统 - 计价引擎
// ==========================================
// 职责: 单条投放明细的 GRP / 毛价 / 净价 / 净净价计算
// 输入: LineItem + PricingConfig
// 输出: PricingResult
// 红线: 纯函数，无 I/O；输入缺失使用默认值，永不报错
// ==========================================

mod core;
mod inputs;


pub use core::PricingEngine;
pub use inputs::{
    clamp_discount, parse_lenient, DEFAULT_ADVANCE_PURCHASE_INDEX, DEFAULT_CHANNEL_SHARE,
    DEFAULT_CLIP_DURATION, DEFAULT_DURATION_INDEX, DEFAULT_MULTIPLIER, DEFAULT_NPT_ZONE_SHARE,
    DEFAULT_PT_ZONE_SHARE, DEFAULT_SEASONAL_INDEX, DEFAULT_TRP_PURCHASE_INDEX,
};
