// ==========================================
// 电视广告投放计划系统 - 操作日志数据仓储
// ==========================================
// 对齐: action_log 表
// 用途: 折扣保存、TRP 分配、明细重算/删除的审计追踪
// ==========================================

mod core;
mod queries;

#[cfg(test)]
mod tests;

pub use core::ActionLogRepository;
