// ==========================================
// 电视广告投放计划系统 - 折扣与波段成本领域模型
// ==========================================
// 红线: 每个作用域每种类型至多一条记录；0% 等价于无记录
// ==========================================

use crate::domain::types::DiscountType;
use serde::{Deserialize, Serialize};

/// 折扣作用域：波段（当前形态）或活动（旧形态）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id", rename_all = "snake_case")]
pub enum DiscountScope {
    Wave(i64),
    Campaign(i64),
}

// ==========================================
// Discount - 折扣记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub id: i64,
    pub scope: DiscountScope,
    pub discount_type: DiscountType,
    pub percentage: f64,
}

// ==========================================
// EffectiveDiscounts - 生效折扣
// ==========================================
// 波段记录优先，其次旧版活动记录，都没有则为 0
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectiveDiscounts {
    pub client_percent: f64,
    pub agency_percent: f64,
}

impl EffectiveDiscounts {
    /// 由波段折扣与活动折扣合成生效折扣
    pub fn resolve(wave_discounts: &[Discount], campaign_discounts: &[Discount]) -> Self {
        let pick = |t: DiscountType| {
            wave_discounts
                .iter()
                .find(|d| d.discount_type == t)
                .or_else(|| campaign_discounts.iter().find(|d| d.discount_type == t))
                .map(|d| d.percentage)
                .unwrap_or(0.0)
        };

        Self {
            client_percent: pick(DiscountType::Client),
            agency_percent: pick(DiscountType::Agency),
        }
    }
}

// ==========================================
// WaveCost - 波段汇总成本
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WaveCost {
    pub wave_id: i64,
    pub base_cost: f64,   // Σ gross
    pub client_cost: f64, // Σ net
    pub agency_cost: f64, // Σ net-net
    pub client_discount_percent: f64,
    pub agency_discount_percent: f64,
}
