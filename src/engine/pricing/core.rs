use super::inputs::{
    clamp_discount, value_or, DEFAULT_ADVANCE_PURCHASE_INDEX, DEFAULT_CHANNEL_SHARE,
    DEFAULT_CLIP_DURATION, DEFAULT_DURATION_INDEX, DEFAULT_MULTIPLIER, DEFAULT_PT_ZONE_SHARE,
    DEFAULT_SEASONAL_INDEX, DEFAULT_TRP_PURCHASE_INDEX,
};
use crate::config::PricingConfig;
use crate::domain::line_item::{LineItem, PricingResult};
use crate::domain::types::{GrpFormula, GrpFormulaSelection};

// ==========================================
// PricingEngine - 计价引擎
// ==========================================
pub struct PricingEngine {
    // 无状态引擎,不需要注入依赖
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PricingEngine {
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算单条明细的价格
    ///
    /// 公式:
    /// - Gross = trp × gross_cpp × [clip_duration] × ∏指数
    /// - Net = Gross × (1 − client%/100)
    /// - NetNet = Net × (1 − agency%/100)
    ///
    /// 任一结果溢出为非有限值时记 0 并告警
    pub fn price(&self, item: &LineItem, config: &PricingConfig) -> PricingResult {
        let trp = value_or(item.trp, 0.0);
        let (grp_formula, grp) = self.compute_grp(item, config.grp_formula);
        let grp = finite_or_zero(item, "grp", grp);

        let gross_price = trp * value_or(item.gross_cpp, 0.0)
            * self.clip_factor(item, config)
            * self.index_product(item);
        let gross_price = finite_or_zero(item, "gross_price", gross_price);

        let client = clamp_discount(item.client_discount_percent);
        let agency = clamp_discount(item.agency_discount_percent);

        let net_price = finite_or_zero(item, "net_price", gross_price * (1.0 - client / 100.0));
        let net_net_price =
            finite_or_zero(item, "net_net_price", net_price * (1.0 - agency / 100.0));

        PricingResult {
            grp,
            gross_price,
            net_price,
            net_net_price,
            grp_formula,
        }
    }

    /// 选择并计算 GRP
    ///
    /// Auto: affinity1 > 0 时按 affinity 公式，否则按份额公式
    pub fn compute_grp(
        &self,
        item: &LineItem,
        selection: GrpFormulaSelection,
    ) -> (GrpFormula, f64) {
        let formula = self.select_formula(item, selection);
        let trp = value_or(item.trp, 0.0);

        let grp = match formula {
            GrpFormula::ShareBased => {
                trp * value_or(item.channel_share, DEFAULT_CHANNEL_SHARE)
                    * value_or(item.pt_zone_share, DEFAULT_PT_ZONE_SHARE)
            }
            GrpFormula::AffinityBased => {
                let affinity = value_or(item.affinity1, 0.0);
                if affinity > 0.0 {
                    trp * 100.0 / affinity
                } else {
                    0.0
                }
            }
        };

        (formula, grp)
    }

    fn select_formula(&self, item: &LineItem, selection: GrpFormulaSelection) -> GrpFormula {
        match selection {
            GrpFormulaSelection::Share => GrpFormula::ShareBased,
            GrpFormulaSelection::Affinity => GrpFormula::AffinityBased,
            GrpFormulaSelection::Auto => {
                if value_or(item.affinity1, 0.0) > 0.0 {
                    GrpFormula::AffinityBased
                } else {
                    GrpFormula::ShareBased
                }
            }
        }
    }

    fn clip_factor(&self, item: &LineItem, config: &PricingConfig) -> f64 {
        if config.include_clip_duration {
            value_or(item.clip_duration, DEFAULT_CLIP_DURATION)
        } else {
            1.0
        }
    }

    /// 全部指数之积（缺失项取各自默认值）
    pub fn index_product(&self, item: &LineItem) -> f64 {
        value_or(item.duration_index, DEFAULT_DURATION_INDEX)
            * value_or(item.seasonal_index, DEFAULT_SEASONAL_INDEX)
            * value_or(item.trp_purchase_index, DEFAULT_TRP_PURCHASE_INDEX)
            * value_or(item.advance_purchase_index, DEFAULT_ADVANCE_PURCHASE_INDEX)
            * value_or(item.position_index, DEFAULT_MULTIPLIER)
            * value_or(item.web_index, DEFAULT_MULTIPLIER)
            * value_or(item.advance_payment_index, DEFAULT_MULTIPLIER)
            * value_or(item.loyalty_discount_index, DEFAULT_MULTIPLIER)
    }
}

/// 溢出（inf / NaN）的结果按 0 处理，计算不中断
fn finite_or_zero(item: &LineItem, field: &str, value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        tracing::warn!(line_item_id = item.id, field, value = %value, "计价结果溢出，按 0 处理");
        0.0
    }
}
