// ==========================================
// 电视广告投放计划系统 - 配置层
// ==========================================
// 职责: 系统配置管理
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod planner_config;

// 重导出核心配置管理器
pub use config_manager::ConfigManager;
pub use planner_config::{config_keys, PlannerConfig, PricingConfig};
