use super::{ensure_id, PlannerApi};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::context::PlanningContext;
use crate::domain::line_item::{LineItem, LineItemPatch, NewLineItem};
use crate::engine::LineItemDeleteOutcome;

impl PlannerApi {
    /// 查询波段明细
    pub async fn list_line_items(&self, wave_id: i64) -> ApiResult<Vec<LineItem>> {
        ensure_id(wave_id, "波段ID")?;
        Ok(self.stores.line_items.list_by_wave(wave_id).await?)
    }

    /// 新增明细
    pub async fn add_line_item(
        &self,
        ctx: &PlanningContext,
        wave_id: i64,
        request: NewLineItem,
    ) -> ApiResult<LineItem> {
        ensure_id(wave_id, "波段ID")?;
        if request.channel_group.trim().is_empty() {
            return Err(ApiError::InvalidInput("频道组不能为空".to_string()));
        }
        if request.target_group.trim().is_empty() {
            return Err(ApiError::InvalidInput("目标群体不能为空".to_string()));
        }
        Ok(self
            .line_item_commands()?
            .add_line_item(ctx, wave_id, request)
            .await?)
    }

    /// 保存明细并重算
    pub async fn recompute_line_item(
        &self,
        ctx: &PlanningContext,
        line_item_id: i64,
        patch: LineItemPatch,
    ) -> ApiResult<LineItem> {
        ensure_id(line_item_id, "明细ID")?;
        Ok(self
            .line_item_commands()?
            .recompute_line_item(ctx, line_item_id, patch)
            .await?)
    }

    /// 删除明细（可能级联删除空波段）
    pub async fn delete_line_item(
        &self,
        ctx: &PlanningContext,
        line_item_id: i64,
    ) -> ApiResult<LineItemDeleteOutcome> {
        ensure_id(line_item_id, "明细ID")?;
        Ok(self
            .line_item_commands()?
            .delete_line_item(ctx, line_item_id)
            .await?)
    }
}
