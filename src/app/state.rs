// ==========================================
// 电视广告投放计划系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接、仓储与API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::PlannerApi;
use crate::config::ConfigManager;
use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::engine::PlannerStores;
use crate::repository::{
    ActionLogRepository, IndexCatalogRepository, RateCatalogRepository, RepositoryError,
    RepositoryResult, WaveRepository,
};

/// 应用状态
///
/// 所有仓储共享同一个 `Arc<Mutex<Connection>>`
pub struct AppState {
    pub db_path: String,
    pub conn: Arc<Mutex<Connection>>,
    pub config_manager: Arc<ConfigManager>,
    pub planner_api: Arc<PlannerApi>,

    // 管理/初始化场景直接使用的仓储
    pub wave_repo: Arc<WaveRepository>,
    pub index_catalog_repo: Arc<IndexCatalogRepository>,
    pub rate_catalog_repo: Arc<RateCatalogRepository>,
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    /// 打开数据库并初始化全部组件
    pub fn new(db_path: String) -> RepositoryResult<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path)?;
        ensure_schema(&conn)?;

        Ok(Self::from_connection(db_path, Arc::new(Mutex::new(conn))))
    }

    /// 内存数据库（测试/演示）
    pub fn in_memory() -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()?;
        configure_sqlite_connection(&conn)?;
        ensure_schema(&conn)?;
        Ok(Self::from_connection(
            ":memory:".to_string(),
            Arc::new(Mutex::new(conn)),
        ))
    }

    fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Self {
        let config_manager = Arc::new(ConfigManager::from_connection(conn.clone()));
        let stores = PlannerStores::sqlite(conn.clone());
        let planner_api = Arc::new(PlannerApi::new(stores, config_manager.clone()));

        Self {
            db_path,
            wave_repo: Arc::new(WaveRepository::from_connection(conn.clone())),
            index_catalog_repo: Arc::new(IndexCatalogRepository::from_connection(conn.clone())),
            rate_catalog_repo: Arc::new(RateCatalogRepository::from_connection(conn.clone())),
            action_log_repo: Arc::new(ActionLogRepository::new(conn.clone())),
            conn,
            config_manager,
            planner_api,
        }
    }

    /// 检查数据库连通性
    pub fn health_check(&self) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }
}

/// 默认数据库路径
///
/// 顺序: 环境变量 TV_PLANNER_DB_PATH → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var("TV_PLANNER_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./tv_planner.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("tv-campaign-planner");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("tv_planner.db");
        }
    }

    path.to_string_lossy().to_string()
}
