use super::{ensure_id, PlannerApi};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::index_catalog::ResolvedIndices;
use crate::domain::types::{IndexScope, PositionType};
use crate::engine::IndexResolver;
use chrono::Datelike;

impl PlannerApi {
    /// 解析波段指数
    ///
    /// 季节指数按波段开始日期所在月份查找；波段无开始日期时取默认值
    pub async fn resolve_wave_indices(
        &self,
        wave_id: i64,
        channel_group: &str,
        duration_seconds: i32,
        position_type: Option<PositionType>,
    ) -> ApiResult<ResolvedIndices> {
        ensure_id(wave_id, "波段ID")?;
        if channel_group.trim().is_empty() {
            return Err(ApiError::InvalidInput("频道组不能为空".to_string()));
        }

        let wave = self
            .stores
            .waves
            .get_wave(wave_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("Wave(id={})不存在", wave_id)))?;

        let resolver = IndexResolver::new(self.stores.catalog.clone());
        let scope = IndexScope::ChannelGroup(channel_group.to_string());
        Ok(resolver
            .resolve(
                &scope,
                duration_seconds,
                wave.start_date.map(|d| d.month()),
                position_type,
            )
            .await?)
    }
}
