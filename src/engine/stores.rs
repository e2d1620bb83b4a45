// ==========================================
// 电视广告投放计划系统 - 引擎层存储聚合
// ==========================================
// 职责: 聚合核心命令所需的全部存储接口
// 目标: 引擎只依赖 trait 对象，测试可整体替换
// ==========================================

use crate::repository::traits::{
    ActionLogStore, DiscountStore, IndexCatalogStore, LineItemStore, RateCatalogStore,
    TrpAllocationStore, WaveStore,
};
use crate::repository::{
    ActionLogRepository, DiscountRepository, IndexCatalogRepository, LineItemRepository,
    RateCatalogRepository, TrpAllocationRepository, WaveRepository,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// 计划核心存储集合
///
/// # 包含的存储
/// - `waves`: 波段/素材
/// - `line_items`: 投放明细
/// - `discounts`: 折扣
/// - `trp`: TRP 日分配
/// - `catalog`: 指数目录
/// - `rates`: 价目表
/// - `action_log`: 审计日志
#[derive(Clone)]
pub struct PlannerStores {
    pub waves: Arc<dyn WaveStore>,
    pub line_items: Arc<dyn LineItemStore>,
    pub discounts: Arc<dyn DiscountStore>,
    pub trp: Arc<dyn TrpAllocationStore>,
    pub catalog: Arc<dyn IndexCatalogStore>,
    pub rates: Arc<dyn RateCatalogStore>,
    pub action_log: Arc<dyn ActionLogStore>,
}

impl PlannerStores {
    /// 基于同一个 SQLite 连接创建全部仓储
    pub fn sqlite(conn: Arc<Mutex<Connection>>) -> Self {
        Self {
            waves: Arc::new(WaveRepository::from_connection(conn.clone())),
            line_items: Arc::new(LineItemRepository::from_connection(conn.clone())),
            discounts: Arc::new(DiscountRepository::from_connection(conn.clone())),
            trp: Arc::new(TrpAllocationRepository::from_connection(conn.clone())),
            catalog: Arc::new(IndexCatalogRepository::from_connection(conn.clone())),
            rates: Arc::new(RateCatalogRepository::from_connection(conn.clone())),
            action_log: Arc::new(ActionLogRepository::new(conn)),
        }
    }
}
