// ==========================================
// 电视广告投放计划系统 - 审计写入
// ==========================================
// 审计为尽力而为：写入失败只记录 warn，不影响命令结果
// ==========================================

use crate::domain::action_log::{ActionLog, ActionType};
use crate::domain::context::PlanningContext;
use crate::repository::traits::ActionLogStore;
use serde_json::Value as JsonValue;

pub(crate) async fn record_action(
    store: &dyn ActionLogStore,
    ctx: &PlanningContext,
    wave_id: Option<i64>,
    action_type: ActionType,
    payload: JsonValue,
    detail: Option<String>,
) {
    let log = ActionLog::new(ctx, wave_id, action_type, Some(payload), detail);
    if let Err(e) = store.append(&log).await {
        tracing::warn!(
            action_type = %action_type,
            wave_id = ?wave_id,
            error = %e,
            "审计日志写入失败，已忽略"
        );
    }
}
