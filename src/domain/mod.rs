// ==========================================
// 电视广告投放计划系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod action_log;
pub mod campaign;
pub mod context;
pub mod discount;
pub mod index_catalog;
pub mod line_item;
pub mod trp_allocation;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType};
pub use campaign::{Campaign, Tvc, Wave};
pub use context::PlanningContext;
pub use discount::{Discount, DiscountScope, EffectiveDiscounts, WaveCost};
pub use index_catalog::{
    DurationIndexEntry, PositionIndexEntry, RateCardEntry, ResolvedIndices, SeasonalIndexEntry,
};
pub use line_item::{LineItem, LineItemPatch, NewLineItem, PricingResult};
pub use trp_allocation::{CampaignTrpView, DailyTrpMap, WaveDayValue, WaveTrpAllocation};
pub use types::{
    CampaignStatus, DiscountType, GrpFormula, GrpFormulaSelection, IndexScope, PositionType,
};
