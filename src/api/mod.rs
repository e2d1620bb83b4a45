// ==========================================
// 电视广告投放计划系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行/外部界面调用
// ==========================================

pub mod error;
pub mod planner_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use planner_api::PlannerApi;
