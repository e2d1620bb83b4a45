// ==========================================
// 电视广告投放计划系统 - 折扣重算协调器
// ==========================================
// 职责: 保存波段折扣并对波段内每条明细全量重算
// 流程:
// 1. 钳制输入到 [0,100]
// 2. 逐条删除波段既有折扣
// 3. 仅插入非零折扣
// 4. 合成生效折扣（波段 → 旧版活动 → 0）
// 5. 逐条明细写入折扣、重新计价、保存
// 6. 读取波段汇总成本
// 7. 写审计日志（尽力而为）
// 红线: 任一存储调用失败即中止并返回错误，已完成步骤不回滚
// ==========================================

use crate::config::PricingConfig;
use crate::domain::action_log::ActionType;
use crate::domain::campaign::Wave;
use crate::domain::context::PlanningContext;
use crate::domain::discount::{DiscountScope, EffectiveDiscounts, WaveCost};
use crate::domain::types::DiscountType;
use crate::engine::audit::record_action;
use crate::engine::pricing::{clamp_discount, PricingEngine};
use crate::engine::stores::PlannerStores;
use crate::repository::error::{RepositoryError, RepositoryResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Instant;
use tracing::instrument;

// ==========================================
// DiscountRecalcResult - 重算结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountRecalcResult {
    pub wave_id: i64,
    pub discounts: EffectiveDiscounts, // 实际生效的折扣
    pub line_items: usize,             // 重算明细数
    pub cost: WaveCost,                // 重算后的波段汇总
    pub elapsed_ms: i64,               // 耗时(毫秒)
}

// ==========================================
// DiscountCoordinator
// ==========================================
pub struct DiscountCoordinator {
    stores: PlannerStores,
    pricing_engine: PricingEngine,
    config: PricingConfig,
}

impl DiscountCoordinator {
    pub fn new(stores: PlannerStores, config: PricingConfig) -> Self {
        Self {
            stores,
            pricing_engine: PricingEngine::new(),
            config,
        }
    }

    /// 保存波段折扣并重算
    ///
    /// # 参数
    /// - client_percent / agency_percent: 任意数值，超出 [0,100] 时钳制
    ///
    /// # 返回
    /// - Ok(DiscountRecalcResult)
    /// - Err: 第一个失败的存储调用；此前已写入的折扣/明细保持已写入状态
    #[instrument(skip(self, ctx), fields(campaign_id = ctx.campaign_id, actor = %ctx.actor))]
    pub async fn apply_discounts(
        &self,
        ctx: &PlanningContext,
        wave_id: i64,
        client_percent: f64,
        agency_percent: f64,
    ) -> RepositoryResult<DiscountRecalcResult> {
        let start_time = Instant::now();

        // ===== 1. 钳制 =====
        let client = clamp_discount(client_percent);
        let agency = clamp_discount(agency_percent);
        if client != client_percent || agency != agency_percent {
            tracing::debug!(client_percent, agency_percent, client, agency, "折扣输入已钳制");
        }

        let wave = self.require_wave(wave_id).await?;

        // ===== 2. 删除既有波段折扣（逐条）=====
        let existing = self.stores.discounts.list_for_wave(wave_id).await?;
        for discount in &existing {
            self.stores.discounts.delete(discount.id).await?;
        }

        // ===== 3. 插入非零折扣 =====
        for (discount_type, value) in [(DiscountType::Client, client), (DiscountType::Agency, agency)] {
            if value > 0.0 {
                self.stores
                    .discounts
                    .insert(DiscountScope::Wave(wave_id), discount_type, value)
                    .await?;
            }
        }

        // ===== 4. 生效折扣 =====
        let effective = effective_discounts(&self.stores, &wave).await?;

        // ===== 5. 逐条重算 =====
        let items = self.stores.line_items.list_by_wave(wave_id).await?;
        for mut item in items.iter().cloned() {
            item.client_discount_percent = effective.client_percent;
            item.agency_discount_percent = effective.agency_percent;
            let priced = self.pricing_engine.price(&item, &self.config);
            item.apply_pricing(&priced);

            self.stores.line_items.update_line_item(&item).await?;
            tracing::debug!(
                line_item_id = item.id,
                gross = item.gross_price,
                net = item.net_price,
                net_net = item.net_net_price,
                "明细已重算"
            );
        }

        // ===== 6. 汇总成本 =====
        let cost = self.wave_cost_with(wave_id, effective).await?;

        // ===== 7. 审计 =====
        record_action(
            self.stores.action_log.as_ref(),
            ctx,
            Some(wave_id),
            ActionType::DiscountSave,
            json!({
                "client_input": client_percent,
                "agency_input": agency_percent,
                "client_effective": effective.client_percent,
                "agency_effective": effective.agency_percent,
                "removed_records": existing.len(),
                "line_items": items.len(),
                "base_cost": cost.base_cost,
                "client_cost": cost.client_cost,
                "agency_cost": cost.agency_cost,
            }),
            None,
        )
        .await;

        let elapsed_ms = start_time.elapsed().as_millis() as i64;
        tracing::info!(
            wave_id,
            line_items = items.len(),
            client = effective.client_percent,
            agency = effective.agency_percent,
            elapsed_ms,
            "折扣保存并重算完成"
        );

        Ok(DiscountRecalcResult {
            wave_id,
            discounts: effective,
            line_items: items.len(),
            cost,
            elapsed_ms,
        })
    }

    /// 读取波段汇总成本（折扣百分比按当前生效折扣填充）
    pub async fn wave_cost(&self, wave_id: i64) -> RepositoryResult<WaveCost> {
        let wave = self.require_wave(wave_id).await?;
        let effective = effective_discounts(&self.stores, &wave).await?;
        self.wave_cost_with(wave_id, effective).await
    }

    async fn wave_cost_with(
        &self,
        wave_id: i64,
        effective: EffectiveDiscounts,
    ) -> RepositoryResult<WaveCost> {
        let mut cost = self.stores.line_items.wave_cost(wave_id).await?;
        cost.client_discount_percent = effective.client_percent;
        cost.agency_discount_percent = effective.agency_percent;
        Ok(cost)
    }

    async fn require_wave(&self, wave_id: i64) -> RepositoryResult<Wave> {
        self.stores
            .waves
            .get_wave(wave_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Wave", wave_id))
    }
}

/// 合成波段生效折扣：波段记录优先，其次旧版活动记录，都没有则为 0
pub(crate) async fn effective_discounts(
    stores: &PlannerStores,
    wave: &Wave,
) -> RepositoryResult<EffectiveDiscounts> {
    let wave_discounts = stores.discounts.list_for_wave(wave.id).await?;
    let campaign_discounts = stores.discounts.list_for_campaign(wave.campaign_id).await?;
    Ok(EffectiveDiscounts::resolve(&wave_discounts, &campaign_discounts))
}
