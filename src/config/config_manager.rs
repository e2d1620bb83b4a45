// ==========================================
// 电视广告投放计划系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::planner_config::{config_keys, parse_bool_flag, PlannerConfig};
use crate::db::open_sqlite_connection;
use crate::domain::types::GrpFormulaSelection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置的快照
    pub fn get_config_snapshot(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut snapshot = BTreeMap::new();
        for row in rows {
            let (k, v) = row?;
            snapshot.insert(k, v);
        }
        Ok(snapshot)
    }

    /// 加载计划配置
    ///
    /// 缺失或无法解析的键回退到 PlannerConfig::default()，并记录 warn
    pub fn load_planner_config(&self) -> RepositoryResult<PlannerConfig> {
        let mut config = PlannerConfig::default();

        if let Some(raw) = self.get_global_config_value(config_keys::GRP_FORMULA)? {
            match GrpFormulaSelection::parse(&raw) {
                Some(sel) => config.pricing.grp_formula = sel,
                None => tracing::warn!(key = config_keys::GRP_FORMULA, value = %raw, "无法识别的配置值，使用默认"),
            }
        }

        if let Some(raw) = self.get_global_config_value(config_keys::INCLUDE_CLIP_DURATION)? {
            match parse_bool_flag(&raw) {
                Some(v) => config.pricing.include_clip_duration = v,
                None => tracing::warn!(key = config_keys::INCLUDE_CLIP_DURATION, value = %raw, "无法识别的配置值，使用默认"),
            }
        }

        if let Some(raw) = self.get_global_config_value(config_keys::CASCADE_DELETE_ON_LAST_ITEM)? {
            match parse_bool_flag(&raw) {
                Some(v) => config.cascade_delete_empty_wave = v,
                None => tracing::warn!(key = config_keys::CASCADE_DELETE_ON_LAST_ITEM, value = %raw, "无法识别的配置值，使用默认"),
            }
        }

        if let Some(raw) = self.get_global_config_value(config_keys::TRP_ROUNDING_DECIMALS)? {
            match raw.trim().parse::<u32>() {
                Ok(v) if v <= 6 => config.trp_rounding_decimals = v,
                _ => tracing::warn!(key = config_keys::TRP_ROUNDING_DECIMALS, value = %raw, "无法识别的配置值，使用默认"),
            }
        }

        Ok(config)
    }
}
