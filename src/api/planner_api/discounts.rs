use super::{ensure_id, PlannerApi};
use crate::api::error::ApiResult;
use crate::domain::context::PlanningContext;
use crate::domain::discount::{Discount, WaveCost};
use crate::engine::{parse_lenient, DiscountRecalcResult};

impl PlannerApi {
    /// 查询波段折扣记录
    pub async fn list_wave_discounts(&self, wave_id: i64) -> ApiResult<Vec<Discount>> {
        ensure_id(wave_id, "波段ID")?;
        Ok(self.stores.discounts.list_for_wave(wave_id).await?)
    }

    /// 查询波段汇总成本
    pub async fn get_wave_cost(&self, wave_id: i64) -> ApiResult<WaveCost> {
        ensure_id(wave_id, "波段ID")?;
        let coordinator = self.discount_coordinator()?;
        Ok(coordinator.wave_cost(wave_id).await?)
    }

    /// 保存波段折扣并重算全部明细
    ///
    /// 超出 [0,100] 的输入被钳制，不报错
    pub async fn apply_discounts(
        &self,
        ctx: &PlanningContext,
        wave_id: i64,
        client_percent: f64,
        agency_percent: f64,
    ) -> ApiResult<DiscountRecalcResult> {
        ensure_id(wave_id, "波段ID")?;
        let coordinator = self.discount_coordinator()?;
        Ok(coordinator
            .apply_discounts(ctx, wave_id, client_percent, agency_percent)
            .await?)
    }

    /// 以表单文本保存折扣（宽松解析，无法解析视为 0）
    pub async fn apply_discounts_text(
        &self,
        ctx: &PlanningContext,
        wave_id: i64,
        client_raw: &str,
        agency_raw: &str,
    ) -> ApiResult<DiscountRecalcResult> {
        let client = parse_lenient(client_raw).unwrap_or(0.0);
        let agency = parse_lenient(agency_raw).unwrap_or(0.0);
        self.apply_discounts(ctx, wave_id, client, agency).await
    }
}
