// ==========================================
// 电视广告投放计划系统 - 指数解析器
// ==========================================
// 职责: 按作用域从指数目录解析时长 / 季节 / 位置指数
// 规则:
// - 时长: 精确命中 → 不超过请求值的最大档位 → 1.25
// - 季节: 当月记录 → 0.9
// - 位置: 目录记录 → 1.0
// 红线: Engine 不拼 SQL，目录缺失不报错
// ==========================================

use crate::domain::index_catalog::{DurationIndexEntry, ResolvedIndices};
use crate::domain::types::{IndexScope, PositionType};
use crate::engine::pricing::{DEFAULT_DURATION_INDEX, DEFAULT_MULTIPLIER, DEFAULT_SEASONAL_INDEX};
use crate::repository::error::RepositoryResult;
use crate::repository::traits::IndexCatalogStore;
use std::sync::Arc;
use tracing::instrument;

pub struct IndexResolver {
    catalog: Arc<dyn IndexCatalogStore>,
}

impl IndexResolver {
    pub fn new(catalog: Arc<dyn IndexCatalogStore>) -> Self {
        Self { catalog }
    }

    /// 解析一组指数
    ///
    /// # 参数
    /// - scope: 频道组或目标群体作用域
    /// - duration_seconds: 素材时长（秒）
    /// - month: 1-12；None 时季节指数取 0.9
    /// - position_type: 位置类型；None 时位置指数取 1.0
    #[instrument(skip(self, scope), fields(scope = %scope))]
    pub async fn resolve(
        &self,
        scope: &IndexScope,
        duration_seconds: i32,
        month: Option<u32>,
        position_type: Option<PositionType>,
    ) -> RepositoryResult<ResolvedIndices> {
        let durations = self.catalog.duration_indices(scope).await?;
        let duration = pick_duration_index(&durations, duration_seconds);

        let seasonal = match month {
            Some(m) => self.catalog.seasonal_index(scope, m).await?,
            None => None,
        };

        let position = match position_type {
            Some(p) => self.catalog.position_index(scope, p).await?,
            None => None,
        };

        let resolved = ResolvedIndices {
            duration_index: duration.unwrap_or(DEFAULT_DURATION_INDEX),
            seasonal_index: seasonal
                .as_ref()
                .map(|e| e.index_value)
                .unwrap_or(DEFAULT_SEASONAL_INDEX),
            position_index: position
                .as_ref()
                .map(|e| e.index_value)
                .unwrap_or(DEFAULT_MULTIPLIER),
            duration_from_catalog: duration.is_some(),
            seasonal_from_catalog: seasonal.is_some(),
            position_from_catalog: position.is_some(),
        };

        if !resolved.duration_from_catalog || !resolved.seasonal_from_catalog {
            tracing::debug!(
                duration_seconds,
                month = ?month,
                duration_from_catalog = resolved.duration_from_catalog,
                seasonal_from_catalog = resolved.seasonal_from_catalog,
                "指数目录未命中，使用默认值"
            );
        }

        Ok(resolved)
    }
}

/// 档位语义：精确命中优先，否则取不超过请求值的最大时长
fn pick_duration_index(entries: &[DurationIndexEntry], duration_seconds: i32) -> Option<f64> {
    if let Some(exact) = entries
        .iter()
        .find(|e| e.duration_seconds == duration_seconds)
    {
        return Some(exact.index_value);
    }

    entries
        .iter()
        .filter(|e| e.duration_seconds <= duration_seconds)
        .max_by_key(|e| e.duration_seconds)
        .map(|e| e.index_value)
}
