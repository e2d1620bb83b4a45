// ==========================================
// 电视广告投放计划系统 - 计划 API
// ==========================================
// 职责: 对外暴露计价、折扣重算、TRP 分配、明细命令
// 约定: 每次调用读取最新配置，再构造对应引擎
// ==========================================

use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, PlannerConfig};
use crate::engine::{DiscountCoordinator, LineItemCommands, PlannerStores, TrpAllocator};

mod discounts;
mod indices;
mod line_items;
mod trp;

// ==========================================
// PlannerApi - 计划 API
// ==========================================

/// 计划API
///
/// 职责：
/// 1. 指数解析（按波段月份 + 频道组）
/// 2. 折扣保存与全量重算、波段成本
/// 3. TRP 日分配（自动分配、人工编辑、清零、活动视图）
/// 4. 明细新增 / 保存重算 / 删除
pub struct PlannerApi {
    stores: PlannerStores,
    config_manager: Arc<ConfigManager>,
}

impl PlannerApi {
    /// 创建新的PlannerApi实例
    pub fn new(stores: PlannerStores, config_manager: Arc<ConfigManager>) -> Self {
        Self {
            stores,
            config_manager,
        }
    }

    /// 读取当前计划配置
    pub fn load_config(&self) -> ApiResult<PlannerConfig> {
        Ok(self.config_manager.load_planner_config()?)
    }

    fn discount_coordinator(&self) -> ApiResult<DiscountCoordinator> {
        let config = self.load_config()?;
        Ok(DiscountCoordinator::new(self.stores.clone(), config.pricing))
    }

    fn trp_allocator(&self) -> ApiResult<TrpAllocator> {
        let config = self.load_config()?;
        Ok(TrpAllocator::new(self.stores.clone(), config))
    }

    fn line_item_commands(&self) -> ApiResult<LineItemCommands> {
        let config = self.load_config()?;
        Ok(LineItemCommands::new(self.stores.clone(), config))
    }
}

fn ensure_id(id: i64, label: &str) -> ApiResult<()> {
    if id <= 0 {
        return Err(ApiError::InvalidInput(format!("{}无效: {}", label, id)));
    }
    Ok(())
}
