use super::{ensure_id, PlannerApi};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::context::PlanningContext;
use crate::domain::trp_allocation::{CampaignTrpView, DailyTrpMap, WaveTrpAllocation};
use crate::engine::parse_lenient;
use chrono::NaiveDate;

impl PlannerApi {
    /// 读取波段日分配
    pub async fn load_wave_allocation(&self, wave_id: i64) -> ApiResult<WaveTrpAllocation> {
        ensure_id(wave_id, "波段ID")?;
        Ok(self.trp_allocator()?.load_wave(wave_id).await?)
    }

    /// 读取活动级 TRP 视图
    pub async fn load_campaign_allocation(&self, campaign_id: i64) -> ApiResult<CampaignTrpView> {
        ensure_id(campaign_id, "活动ID")?;
        Ok(self.trp_allocator()?.campaign_view(campaign_id).await?)
    }

    /// 批量保存日值
    pub async fn save_trp_allocation(
        &self,
        ctx: &PlanningContext,
        wave_id: i64,
        days: &DailyTrpMap,
    ) -> ApiResult<usize> {
        ensure_id(wave_id, "波段ID")?;
        Ok(self.trp_allocator()?.save_days(ctx, wave_id, days).await?)
    }

    /// 单日人工编辑（表单文本，宽松解析）
    pub async fn set_trp_day(
        &self,
        ctx: &PlanningContext,
        wave_id: i64,
        date: NaiveDate,
        raw_value: &str,
    ) -> ApiResult<()> {
        ensure_id(wave_id, "波段ID")?;
        let value = parse_lenient(raw_value)
            .ok_or_else(|| ApiError::InvalidInput(format!("TRP 数值无法解析: {}", raw_value)))?;
        Ok(self
            .trp_allocator()?
            .set_day_value(ctx, wave_id, date, value)
            .await?)
    }

    /// 自动平均分配
    pub async fn redistribute_trp(
        &self,
        ctx: &PlanningContext,
        wave_id: i64,
        total_override: Option<f64>,
    ) -> ApiResult<WaveTrpAllocation> {
        ensure_id(wave_id, "波段ID")?;
        Ok(self
            .trp_allocator()?
            .redistribute_wave(ctx, wave_id, total_override)
            .await?)
    }

    /// 波段清零
    pub async fn clear_wave_trp(&self, ctx: &PlanningContext, wave_id: i64) -> ApiResult<usize> {
        ensure_id(wave_id, "波段ID")?;
        Ok(self.trp_allocator()?.clear_wave(ctx, wave_id).await?)
    }

    /// 活动清零（上下文中的活动）
    pub async fn clear_campaign_trp(&self, ctx: &PlanningContext) -> ApiResult<usize> {
        ensure_id(ctx.campaign_id, "活动ID")?;
        Ok(self.trp_allocator()?.clear_campaign(ctx).await?)
    }
}
