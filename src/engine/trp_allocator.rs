// ==========================================
// 电视广告投放计划系统 - TRP 日分配器
// ==========================================
// 职责: 波段总 TRP 的逐日平均分配、单日人工编辑、清零、活动视图
// 规则:
// - 自动分配覆盖波段范围内的每一天（范围内的人工编辑会丢失）
// - 日值按配置小数位四舍五入，不做尾差修正
// - 人工编辑只写单日，不重新归一化
// 红线: Engine 不拼 SQL；每次存储调用逐一 await
// ==========================================

use crate::config::PlannerConfig;
use crate::domain::action_log::ActionType;
use crate::domain::campaign::Wave;
use crate::domain::context::PlanningContext;
use crate::domain::trp_allocation::{CampaignTrpView, DailyTrpMap, WaveDayValue, WaveTrpAllocation};
use crate::engine::audit::record_action;
use crate::engine::stores::PlannerStores;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use serde_json::json;
use tracing::instrument;

// ==========================================
// 纯函数
// ==========================================

/// 按小数位四舍五入
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// 平均分配：total / 天数（含首尾），逐日四舍五入
///
/// 起止倒置时返回空表；非有限 total 视为 0
pub fn even_distribution(
    total: f64,
    start: NaiveDate,
    end: NaiveDate,
    decimals: u32,
) -> DailyTrpMap {
    let mut days = DailyTrpMap::new();
    if end < start {
        return days;
    }

    let total = if total.is_finite() { total } else { 0.0 };
    let day_count = (end - start).num_days() + 1;
    let per_day = round_to(total / day_count as f64, decimals);

    for day in start.iter_days().take_while(|d| *d <= end) {
        days.insert(day, per_day);
    }
    days
}

// ==========================================
// TrpAllocator - 日分配命令
// ==========================================
pub struct TrpAllocator {
    stores: PlannerStores,
    config: PlannerConfig,
}

impl TrpAllocator {
    pub fn new(stores: PlannerStores, config: PlannerConfig) -> Self {
        Self { stores, config }
    }

    async fn require_wave(&self, wave_id: i64) -> RepositoryResult<Wave> {
        self.stores
            .waves
            .get_wave(wave_id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Wave", wave_id))
    }

    /// 读取波段日分配
    pub async fn load_wave(&self, wave_id: i64) -> RepositoryResult<WaveTrpAllocation> {
        let days = self.stores.trp.load(wave_id).await?;
        Ok(WaveTrpAllocation { wave_id, days })
    }

    /// 重新平均分配波段 TRP
    ///
    /// # 参数
    /// - total_override: 指定总量；None 时取波段明细 TRP 之和
    ///
    /// # 返回
    /// 写入后的波段日分配（范围外既有日值原样保留）
    #[instrument(skip(self, ctx), fields(campaign_id = ctx.campaign_id))]
    pub async fn redistribute_wave(
        &self,
        ctx: &PlanningContext,
        wave_id: i64,
        total_override: Option<f64>,
    ) -> RepositoryResult<WaveTrpAllocation> {
        let wave = self.require_wave(wave_id).await?;

        let total = match total_override {
            Some(t) => t,
            None => self.wave_total_trp(wave_id).await?,
        };

        let (start, end) = match (wave.start_date, wave.end_date) {
            (Some(s), Some(e)) if e >= s => (s, e),
            _ => {
                tracing::warn!(
                    wave_id,
                    start = ?wave.start_date,
                    end = ?wave.end_date,
                    "波段日期缺失或倒置，跳过自动分配"
                );
                return self.load_wave(wave_id).await;
            }
        };

        let days = even_distribution(total, start, end, self.config.trp_rounding_decimals);
        let written = self.stores.trp.upsert_days(wave_id, &days).await?;

        tracing::info!(wave_id, total, days = written, "TRP 自动分配完成");

        record_action(
            self.stores.action_log.as_ref(),
            ctx,
            Some(wave_id),
            ActionType::TrpRedistribute,
            json!({
                "total": total,
                "total_override": total_override,
                "start": start.to_string(),
                "end": end.to_string(),
                "days": written,
            }),
            None,
        )
        .await;

        self.load_wave(wave_id).await
    }

    /// 单日人工编辑（不归一化其他日期）
    ///
    /// 范围外的日期同样接受，只记录 warn
    #[instrument(skip(self, ctx), fields(campaign_id = ctx.campaign_id))]
    pub async fn set_day_value(
        &self,
        ctx: &PlanningContext,
        wave_id: i64,
        date: NaiveDate,
        value: f64,
    ) -> RepositoryResult<()> {
        if !value.is_finite() {
            return Err(RepositoryError::FieldValueError {
                field: "trp_value".to_string(),
                message: format!("非法数值: {}", value),
            });
        }

        let wave = self.require_wave(wave_id).await?;
        if !wave.contains(date) {
            tracing::warn!(wave_id, %date, "编辑日期不在波段范围内");
        }

        let mut day = DailyTrpMap::new();
        day.insert(date, value);
        self.stores.trp.upsert_days(wave_id, &day).await?;

        record_action(
            self.stores.action_log.as_ref(),
            ctx,
            Some(wave_id),
            ActionType::TrpManualEdit,
            json!({ "date": date.to_string(), "value": value }),
            None,
        )
        .await;

        Ok(())
    }

    /// 批量保存日值（逐日 upsert，不归一化）
    ///
    /// # 返回
    /// 写入天数
    #[instrument(skip(self, ctx, days), fields(campaign_id = ctx.campaign_id, days = days.len()))]
    pub async fn save_days(
        &self,
        ctx: &PlanningContext,
        wave_id: i64,
        days: &DailyTrpMap,
    ) -> RepositoryResult<usize> {
        if let Some((date, value)) = days.iter().find(|(_, v)| !v.is_finite()) {
            return Err(RepositoryError::FieldValueError {
                field: "trp_value".to_string(),
                message: format!("{} 非法数值: {}", date, value),
            });
        }

        let wave = self.require_wave(wave_id).await?;
        let outside = days.keys().filter(|d| !wave.contains(**d)).count();
        if outside > 0 {
            tracing::warn!(wave_id, outside, "部分日期不在波段范围内");
        }

        let written = self.stores.trp.upsert_days(wave_id, days).await?;

        record_action(
            self.stores.action_log.as_ref(),
            ctx,
            Some(wave_id),
            ActionType::TrpManualEdit,
            json!({ "days": written, "total": days.values().sum::<f64>() }),
            None,
        )
        .await;

        Ok(written)
    }

    /// 波段清零：已存储的日期与范围内每一天全部置 0
    ///
    /// # 返回
    /// 置零的天数
    #[instrument(skip(self, ctx), fields(campaign_id = ctx.campaign_id))]
    pub async fn clear_wave(&self, ctx: &PlanningContext, wave_id: i64) -> RepositoryResult<usize> {
        let wave = self.require_wave(wave_id).await?;
        let cleared = self.zero_wave(&wave).await?;

        record_action(
            self.stores.action_log.as_ref(),
            ctx,
            Some(wave_id),
            ActionType::TrpClear,
            json!({ "days": cleared }),
            None,
        )
        .await;

        Ok(cleared)
    }

    /// 活动清零：逐个波段清零
    #[instrument(skip(self, ctx), fields(campaign_id = ctx.campaign_id))]
    pub async fn clear_campaign(&self, ctx: &PlanningContext) -> RepositoryResult<usize> {
        let waves = self
            .stores
            .waves
            .list_waves_by_campaign(ctx.campaign_id)
            .await?;

        let mut total = 0;
        for wave in &waves {
            total += self.zero_wave(wave).await?;
        }

        record_action(
            self.stores.action_log.as_ref(),
            ctx,
            None,
            ActionType::TrpClear,
            json!({ "waves": waves.len(), "days": total }),
            Some("campaign".to_string()),
        )
        .await;

        Ok(total)
    }

    /// 活动级视图：各波段日分配并列，不做冲突消解
    pub async fn campaign_view(&self, campaign_id: i64) -> RepositoryResult<CampaignTrpView> {
        let waves = self.stores.waves.list_waves_by_campaign(campaign_id).await?;

        let mut view = CampaignTrpView {
            campaign_id,
            ..CampaignTrpView::default()
        };

        for wave in waves {
            let allocation = self.load_wave(wave.id).await?;
            let wave_name = wave.display_name();
            for (date, value) in &allocation.days {
                view.by_day.entry(*date).or_default().push(WaveDayValue {
                    wave_id: wave.id,
                    wave_name: wave_name.clone(),
                    value: *value,
                });
            }
            view.waves.push(allocation);
        }

        Ok(view)
    }

    // ==========================================
    // 内部方法
    // ==========================================

    async fn wave_total_trp(&self, wave_id: i64) -> RepositoryResult<f64> {
        let items = self.stores.line_items.list_by_wave(wave_id).await?;
        Ok(items
            .iter()
            .filter_map(|i| i.trp)
            .filter(|t| t.is_finite())
            .sum())
    }

    async fn zero_wave(&self, wave: &Wave) -> RepositoryResult<usize> {
        let mut days: DailyTrpMap = self
            .stores
            .trp
            .load(wave.id)
            .await?
            .into_keys()
            .map(|d| (d, 0.0))
            .collect();
        for day in wave.active_days() {
            days.insert(day, 0.0);
        }

        if days.is_empty() {
            return Ok(0);
        }
        self.stores.trp.upsert_days(wave.id, &days).await
    }
}
