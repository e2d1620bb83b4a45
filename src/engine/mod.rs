// ==========================================
// 电视广告投放计划系统 - 引擎层
// ==========================================
// 职责: 计价、TRP 日分配、折扣重算、明细命令
// 红线: Engine 不拼 SQL，只通过存储 trait 访问数据
// ==========================================

pub(crate) mod audit;
pub mod discount_coordinator;
pub mod index_resolver;
pub mod line_item_ops;
pub mod pricing;
pub mod stores;
pub mod trp_allocator;

// 重导出核心引擎
pub use discount_coordinator::{DiscountCoordinator, DiscountRecalcResult};
pub use index_resolver::IndexResolver;
pub use line_item_ops::{apply_patch, LineItemCommands, LineItemDeleteOutcome};
pub use pricing::{clamp_discount, parse_lenient, PricingEngine};
pub use stores::PlannerStores;
pub use trp_allocator::{even_distribution, TrpAllocator};
