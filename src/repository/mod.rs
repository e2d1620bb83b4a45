// ==========================================
// 电视广告投放计划系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod action_log_repo;
pub mod discount_repo;
pub mod error;
pub mod index_catalog_repo;
pub mod line_item_repo;
pub mod rate_catalog_repo;
pub(crate) mod row_mapping;
pub mod traits;
pub mod trp_allocation_repo;
pub mod wave_repo;

// 重导出核心仓储
pub use action_log_repo::ActionLogRepository;
pub use discount_repo::DiscountRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use index_catalog_repo::IndexCatalogRepository;
pub use line_item_repo::LineItemRepository;
pub use rate_catalog_repo::RateCatalogRepository;
pub use traits::{
    ActionLogStore, DiscountStore, IndexCatalogStore, LineItemStore, RateCatalogStore,
    TrpAllocationStore, WaveStore,
};
pub use trp_allocation_repo::TrpAllocationRepository;
pub use wave_repo::WaveRepository;
