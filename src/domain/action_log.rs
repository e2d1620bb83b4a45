// ==========================================
// 电视广告投放计划系统 - 操作日志领域模型
// ==========================================
// 用途: 审计追踪（折扣保存、TRP 分配、明细重算/删除）
// 对齐: action_log 表
// ==========================================

use crate::domain::context::PlanningContext;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;
use uuid::Uuid;

// ==========================================
// ActionLog - 操作日志
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,
    pub campaign_id: Option<i64>,
    pub wave_id: Option<i64>,
    pub action_type: String,       // 操作类型 (存储为字符串)
    pub action_ts: NaiveDateTime,
    pub actor: String,
    pub payload_json: Option<JsonValue>,
    pub detail: Option<String>,
}

impl ActionLog {
    /// 按上下文构造一条日志（action_id 为随机 UUID，时间为当前 UTC）
    pub fn new(
        ctx: &PlanningContext,
        wave_id: Option<i64>,
        action_type: ActionType,
        payload_json: Option<JsonValue>,
        detail: Option<String>,
    ) -> Self {
        Self {
            action_id: Uuid::new_v4().to_string(),
            campaign_id: Some(ctx.campaign_id),
            wave_id: wave_id.or(ctx.wave_id),
            action_type: action_type.to_string(),
            action_ts: Utc::now().naive_utc(),
            actor: ctx.actor.clone(),
            payload_json,
            detail,
        }
    }
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    DiscountSave,        // 保存折扣并全量重算
    LineItemAdd,         // 新增明细
    LineItemRecompute,   // 明细保存重算
    LineItemDelete,      // 删除明细
    WaveCascadeDelete,   // 删除最后一条明细后级联删除波段
    TrpRedistribute,     // TRP 自动平均分配
    TrpManualEdit,       // TRP 单日人工编辑
    TrpClear,            // TRP 清零
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionType::DiscountSave => "DiscountSave",
            ActionType::LineItemAdd => "LineItemAdd",
            ActionType::LineItemRecompute => "LineItemRecompute",
            ActionType::LineItemDelete => "LineItemDelete",
            ActionType::WaveCascadeDelete => "WaveCascadeDelete",
            ActionType::TrpRedistribute => "TrpRedistribute",
            ActionType::TrpManualEdit => "TrpManualEdit",
            ActionType::TrpClear => "TrpClear",
        };
        write!(f, "{}", s)
    }
}
