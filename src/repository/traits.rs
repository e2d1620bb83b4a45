// ==========================================
// 电视广告投放计划系统 - 存储接口 Trait
// ==========================================
// 职责: 定义核心引擎所依赖的数据访问接口（不包含业务逻辑）
// 实现者: *Repository（使用 rusqlite）；测试中可替换为内存/故障注入实现
// 约束: 引擎对每个调用逐一 await，不并发、不重试
// ==========================================

use crate::domain::action_log::ActionLog;
use crate::domain::campaign::{Tvc, Wave};
use crate::domain::discount::{Discount, DiscountScope, WaveCost};
use crate::domain::index_catalog::{
    DurationIndexEntry, PositionIndexEntry, RateCardEntry, SeasonalIndexEntry,
};
use crate::domain::line_item::LineItem;
use crate::domain::trp_allocation::DailyTrpMap;
use crate::domain::types::{DiscountType, IndexScope, PositionType};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// WaveStore - 波段/素材访问
// ==========================================
#[async_trait]
pub trait WaveStore: Send + Sync {
    async fn get_wave(&self, wave_id: i64) -> RepositoryResult<Option<Wave>>;

    /// 活动下全部波段（按 id 升序）
    async fn list_waves_by_campaign(&self, campaign_id: i64) -> RepositoryResult<Vec<Wave>>;

    /// 删除波段（明细、折扣、日分配随外键级联删除）
    async fn delete_wave(&self, wave_id: i64) -> RepositoryResult<()>;

    async fn get_tvc(&self, tvc_id: i64) -> RepositoryResult<Option<Tvc>>;
}

// ==========================================
// LineItemStore - 投放明细访问
// ==========================================
#[async_trait]
pub trait LineItemStore: Send + Sync {
    async fn get_line_item(&self, id: i64) -> RepositoryResult<Option<LineItem>>;

    /// 波段下全部明细（按 id 升序）
    async fn list_by_wave(&self, wave_id: i64) -> RepositoryResult<Vec<LineItem>>;

    /// 插入明细，返回新 id
    async fn insert_line_item(&self, item: &LineItem) -> RepositoryResult<i64>;

    /// 整行覆盖写（输入、折扣、计价结果）
    async fn update_line_item(&self, item: &LineItem) -> RepositoryResult<()>;

    async fn delete_line_item(&self, id: i64) -> RepositoryResult<()>;

    async fn count_by_wave(&self, wave_id: i64) -> RepositoryResult<usize>;

    /// 波段汇总成本（Σ gross / Σ net / Σ net-net）
    ///
    /// 只汇总金额；折扣百分比字段由调用方按生效折扣填充
    async fn wave_cost(&self, wave_id: i64) -> RepositoryResult<WaveCost>;
}

// ==========================================
// DiscountStore - 折扣访问
// ==========================================
#[async_trait]
pub trait DiscountStore: Send + Sync {
    async fn list_for_wave(&self, wave_id: i64) -> RepositoryResult<Vec<Discount>>;

    /// 旧版活动级折扣
    async fn list_for_campaign(&self, campaign_id: i64) -> RepositoryResult<Vec<Discount>>;

    async fn delete(&self, discount_id: i64) -> RepositoryResult<()>;

    /// 插入折扣，返回新 id
    async fn insert(
        &self,
        scope: DiscountScope,
        discount_type: DiscountType,
        percentage: f64,
    ) -> RepositoryResult<i64>;
}

// ==========================================
// TrpAllocationStore - TRP 日分配访问
// ==========================================
#[async_trait]
pub trait TrpAllocationStore: Send + Sync {
    /// 读取波段日分配；无记录时返回空表
    async fn load(&self, wave_id: i64) -> RepositoryResult<DailyTrpMap>;

    /// 按 (wave_id, 日期) 幂等 upsert，返回写入天数
    async fn upsert_days(&self, wave_id: i64, days: &DailyTrpMap) -> RepositoryResult<usize>;
}

// ==========================================
// IndexCatalogStore - 指数目录访问（只读）
// ==========================================
#[async_trait]
pub trait IndexCatalogStore: Send + Sync {
    /// 作用域下全部时长指数（按秒数升序）
    async fn duration_indices(&self, scope: &IndexScope)
        -> RepositoryResult<Vec<DurationIndexEntry>>;

    async fn seasonal_index(
        &self,
        scope: &IndexScope,
        month: u32,
    ) -> RepositoryResult<Option<SeasonalIndexEntry>>;

    async fn position_index(
        &self,
        scope: &IndexScope,
        position_type: PositionType,
    ) -> RepositoryResult<Option<PositionIndexEntry>>;
}

// ==========================================
// RateCatalogStore - 价目表访问（只读）
// ==========================================
#[async_trait]
pub trait RateCatalogStore: Send + Sync {
    async fn rate_card(
        &self,
        channel_group: &str,
        target_group: &str,
    ) -> RepositoryResult<Option<RateCardEntry>>;
}

// ==========================================
// ActionLogStore - 审计日志写入
// ==========================================
#[async_trait]
pub trait ActionLogStore: Send + Sync {
    async fn append(&self, log: &ActionLog) -> RepositoryResult<()>;
}
