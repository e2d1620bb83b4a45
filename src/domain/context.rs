// ==========================================
// 电视广告投放计划系统 - 计划上下文
// ==========================================
// “当前打开的活动/波段”以显式参数贯穿每个命令，不使用进程级可变全局状态
// ==========================================

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningContext {
    pub campaign_id: i64,
    pub wave_id: Option<i64>,
    /// 操作人（写入审计日志）
    pub actor: String,
}

impl PlanningContext {
    pub fn new(campaign_id: i64, actor: impl Into<String>) -> Self {
        Self {
            campaign_id,
            wave_id: None,
            actor: actor.into(),
        }
    }

    /// 派生一个选中指定波段的上下文
    pub fn with_wave(&self, wave_id: i64) -> Self {
        Self {
            campaign_id: self.campaign_id,
            wave_id: Some(wave_id),
            actor: self.actor.clone(),
        }
    }
}
