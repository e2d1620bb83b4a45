// ==========================================
// 电视广告投放计划系统 - 投放明细命令
// ==========================================
// 职责: 新增 / 保存重算 / 删除明细
// 规则:
// - 保存即重算（显式命令，不依赖字段变更监听）
// - 有 TVC 时素材时长以 TVC 为准
// - 新增时空白的 gross_cpp / 份额从价目表补齐
// - 删除波段最后一条明细时按配置级联删除波段
// ==========================================

use crate::config::PlannerConfig;
use crate::domain::action_log::ActionType;
use crate::domain::campaign::Wave;
use crate::domain::context::PlanningContext;
use crate::domain::line_item::{LineItem, LineItemPatch, NewLineItem};
use crate::domain::types::IndexScope;
use crate::engine::audit::record_action;
use crate::engine::discount_coordinator::effective_discounts;
use crate::engine::index_resolver::IndexResolver;
use crate::engine::pricing::{parse_lenient, PricingEngine, DEFAULT_CLIP_DURATION};
use crate::engine::stores::PlannerStores;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

/// 删除结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemDeleteOutcome {
    pub line_item_id: i64,
    pub wave_id: i64,
    /// 是否因最后一条明细被删而级联删除了波段
    pub wave_deleted: bool,
}

/// 将原始文本补丁写入明细（None 字段不修改，解析失败视为缺失）
pub fn apply_patch(item: &mut LineItem, patch: &LineItemPatch) {
    fn set(target: &mut Option<f64>, raw: &Option<String>) {
        if let Some(raw) = raw {
            *target = parse_lenient(raw);
        }
    }

    if let Some(tvc_id) = patch.tvc_id {
        item.tvc_id = Some(tvc_id);
    }
    set(&mut item.clip_duration, &patch.clip_duration);
    set(&mut item.trp, &patch.trp);
    set(&mut item.affinity1, &patch.affinity1);
    set(&mut item.affinity2, &patch.affinity2);
    set(&mut item.channel_share, &patch.channel_share);
    set(&mut item.pt_zone_share, &patch.pt_zone_share);
    set(&mut item.npt_zone_share, &patch.npt_zone_share);
    set(&mut item.gross_cpp, &patch.gross_cpp);
    set(&mut item.duration_index, &patch.duration_index);
    set(&mut item.seasonal_index, &patch.seasonal_index);
    set(&mut item.trp_purchase_index, &patch.trp_purchase_index);
    set(&mut item.advance_purchase_index, &patch.advance_purchase_index);
    set(&mut item.position_index, &patch.position_index);
    set(&mut item.web_index, &patch.web_index);
    set(&mut item.advance_payment_index, &patch.advance_payment_index);
    set(&mut item.loyalty_discount_index, &patch.loyalty_discount_index);
}

// ==========================================
// LineItemCommands
// ==========================================
pub struct LineItemCommands {
    stores: PlannerStores,
    pricing_engine: PricingEngine,
    resolver: IndexResolver,
    config: PlannerConfig,
}

impl LineItemCommands {
    pub fn new(stores: PlannerStores, config: PlannerConfig) -> Self {
        let resolver = IndexResolver::new(stores.catalog.clone());
        Self {
            stores,
            pricing_engine: PricingEngine::new(),
            resolver,
            config,
        }
    }

    /// 新增明细
    ///
    /// 未显式给出的时长/季节/位置指数从指数目录解析（作用域为频道组）；
    /// 目录未命中时保持缺失，计价时取默认值
    #[instrument(skip(self, ctx, request), fields(campaign_id = ctx.campaign_id, channel_group = %request.channel_group))]
    pub async fn add_line_item(
        &self,
        ctx: &PlanningContext,
        wave_id: i64,
        request: NewLineItem,
    ) -> RepositoryResult<LineItem> {
        let wave = self.require_wave(wave_id).await?;

        let mut item = LineItem::blank(wave_id, &request.channel_group, &request.target_group);
        apply_patch(&mut item, &request.fields);
        self.sync_clip_duration(&mut item).await?;

        // ===== 价目表：只补空白字段 =====
        if let Some(rate) = self
            .stores
            .rates
            .rate_card(&request.channel_group, &request.target_group)
            .await?
        {
            item.gross_cpp = item.gross_cpp.or(Some(rate.gross_cpp));
            item.channel_share = item.channel_share.or(rate.channel_share);
            item.pt_zone_share = item.pt_zone_share.or(rate.pt_zone_share);
            item.npt_zone_share = item.npt_zone_share.or(rate.npt_zone_share);
        }

        // ===== 指数目录 =====
        let scope = IndexScope::ChannelGroup(request.channel_group.clone());
        let duration_seconds = item
            .clip_duration
            .filter(|d| d.is_finite())
            .unwrap_or(DEFAULT_CLIP_DURATION)
            .round() as i32;
        let month = wave.start_date.map(|d| d.month());
        let resolved = self
            .resolver
            .resolve(&scope, duration_seconds, month, request.position_type)
            .await?;

        if item.duration_index.is_none() && resolved.duration_from_catalog {
            item.duration_index = Some(resolved.duration_index);
        }
        if item.seasonal_index.is_none() && resolved.seasonal_from_catalog {
            item.seasonal_index = Some(resolved.seasonal_index);
        }
        if item.position_index.is_none() && resolved.position_from_catalog {
            item.position_index = Some(resolved.position_index);
        }

        self.price_with_wave_discounts(&wave, &mut item).await?;
        item.id = self.stores.line_items.insert_line_item(&item).await?;

        tracing::info!(line_item_id = item.id, wave_id, gross = item.gross_price, "明细已新增");
        record_action(
            self.stores.action_log.as_ref(),
            ctx,
            Some(wave_id),
            ActionType::LineItemAdd,
            json!({ "line_item_id": item.id, "gross_price": item.gross_price }),
            None,
        )
        .await;

        Ok(item)
    }

    /// 保存明细并重算
    #[instrument(skip(self, ctx, patch), fields(campaign_id = ctx.campaign_id))]
    pub async fn recompute_line_item(
        &self,
        ctx: &PlanningContext,
        line_item_id: i64,
        patch: LineItemPatch,
    ) -> RepositoryResult<LineItem> {
        let mut item = self.require_line_item(line_item_id).await?;
        let wave = self.require_wave(item.wave_id).await?;

        apply_patch(&mut item, &patch);
        self.sync_clip_duration(&mut item).await?;
        self.price_with_wave_discounts(&wave, &mut item).await?;
        self.stores.line_items.update_line_item(&item).await?;

        tracing::debug!(
            line_item_id,
            grp = item.grp,
            gross = item.gross_price,
            net = item.net_price,
            net_net = item.net_net_price,
            "明细已重算"
        );
        record_action(
            self.stores.action_log.as_ref(),
            ctx,
            Some(item.wave_id),
            ActionType::LineItemRecompute,
            json!({
                "line_item_id": line_item_id,
                "gross_price": item.gross_price,
                "net_price": item.net_price,
                "net_net_price": item.net_net_price,
            }),
            None,
        )
        .await;

        Ok(item)
    }

    /// 删除明细
    ///
    /// 删除后波段为空且 cascade_delete_empty_wave 开启时，同时删除波段
    #[instrument(skip(self, ctx), fields(campaign_id = ctx.campaign_id))]
    pub async fn delete_line_item(
        &self,
        ctx: &PlanningContext,
        line_item_id: i64,
    ) -> RepositoryResult<LineItemDeleteOutcome> {
        let item = self.require_line_item(line_item_id).await?;
        let wave_id = item.wave_id;

        self.stores.line_items.delete_line_item(line_item_id).await?;
        record_action(
            self.stores.action_log.as_ref(),
            ctx,
            Some(wave_id),
            ActionType::LineItemDelete,
            json!({ "line_item_id": line_item_id }),
            None,
        )
        .await;

        let remaining = self.stores.line_items.count_by_wave(wave_id).await?;
        let wave_deleted = remaining == 0 && self.config.cascade_delete_empty_wave;

        if wave_deleted {
            self.stores.waves.delete_wave(wave_id).await?;
            tracing::info!(wave_id, "波段最后一条明细已删除，波段随之删除");
            record_action(
                self.stores.action_log.as_ref(),
                ctx,
                Some(wave_id),
                ActionType::WaveCascadeDelete,
                json!({ "line_item_id": line_item_id }),
                None,
            )
            .await;
        }

        Ok(LineItemDeleteOutcome {
            line_item_id,
            wave_id,
            wave_deleted,
        })
    }

    // ==========================================
    // 内部方法
    // ==========================================

    async fn price_with_wave_discounts(
        &self,
        wave: &Wave,
        item: &mut LineItem,
    ) -> RepositoryResult<()> {
        let effective = effective_discounts(&self.stores, wave).await?;
        item.client_discount_percent = effective.client_percent;
        item.agency_discount_percent = effective.agency_percent;

        let priced = self.pricing_engine.price(item, &self.config.pricing);
        item.apply_pricing(&priced);
        Ok(())
    }

    async fn sync_clip_duration(&self, item: &mut LineItem) -> RepositoryResult<()> {
        if let Some(tvc_id) = item.tvc_id {
            match self.stores.waves.get_tvc(tvc_id).await? {
                Some(tvc) => item.clip_duration = Some(tvc.duration_seconds as f64),
                None => tracing::warn!(tvc_id, "TVC 不存在，沿用明细自身时长"),
            }
        }
        Ok(())
    }

    async fn require_wave(&self, wave_id: i64) -> RepositoryResult<Wave> {
        self.stores
            .waves
            .get_wave(wave_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Wave", wave_id))
    }

    async fn require_line_item(&self, line_item_id: i64) -> RepositoryResult<LineItem> {
        self.stores
            .line_items
            .get_line_item(line_item_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("LineItem", line_item_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_patch_parses_leniently() {
        let mut item = LineItem::blank(1, "AMB Baltics", "A25-55");
        item.trp = Some(50.0);
        item.affinity1 = Some(90.0);

        let patch = LineItemPatch {
            gross_cpp: Some("35,14".to_string()),
            seasonal_index: Some("0,9".to_string()),
            affinity1: Some("n/a".to_string()),
            ..LineItemPatch::default()
        };
        apply_patch(&mut item, &patch);

        assert_eq!(item.trp, Some(50.0), "未提交字段保持不变");
        assert_eq!(item.gross_cpp, Some(35.14));
        assert_eq!(item.seasonal_index, Some(0.9));
        assert_eq!(item.affinity1, None, "无法解析视为缺失");
    }
}
