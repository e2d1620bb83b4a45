// ==========================================
// 电视广告投放计划系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键 + busy_timeout）
// - 统一建表脚本，测试与应用共用同一份 schema
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启（wave 删除依赖 ON DELETE CASCADE）
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 建表（幂等）
///
/// 所有表均使用 CREATE TABLE IF NOT EXISTS，可在每次启动时调用。
/// 指数目录的 scope 采用 (scope_type, scope_key) 两列表达：
/// scope_type ∈ {CHANNEL_GROUP, TARGET_GROUP}
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );

        CREATE TABLE IF NOT EXISTS campaigns (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            client TEXT,
            agency TEXT,
            product TEXT,
            country TEXT,
            start_date TEXT,
            end_date TEXT,
            status TEXT NOT NULL DEFAULT 'draft'
                CHECK (status IN ('draft','confirmed','orders_sent','active','completed'))
        );

        CREATE TABLE IF NOT EXISTS tvcs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            campaign_id INTEGER NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            duration INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS waves (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            campaign_id INTEGER NOT NULL REFERENCES campaigns(id) ON DELETE CASCADE,
            name TEXT,
            start_date TEXT,
            end_date TEXT
        );

        CREATE TABLE IF NOT EXISTS wave_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            wave_id INTEGER NOT NULL REFERENCES waves(id) ON DELETE CASCADE,
            channel_group TEXT NOT NULL,
            target_group TEXT NOT NULL,
            tvc_id INTEGER REFERENCES tvcs(id) ON DELETE SET NULL,
            clip_duration REAL,
            trp REAL,
            affinity1 REAL,
            affinity2 REAL,
            channel_share REAL,
            pt_zone_share REAL,
            npt_zone_share REAL,
            gross_cpp REAL,
            duration_index REAL,
            seasonal_index REAL,
            trp_purchase_index REAL,
            advance_purchase_index REAL,
            position_index REAL,
            web_index REAL,
            advance_payment_index REAL,
            loyalty_discount_index REAL,
            client_discount_percent REAL NOT NULL DEFAULT 0,
            agency_discount_percent REAL NOT NULL DEFAULT 0,
            grp REAL NOT NULL DEFAULT 0,
            gross_price REAL NOT NULL DEFAULT 0,
            net_price REAL NOT NULL DEFAULT 0,
            net_net_price REAL NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_wave_items_wave ON wave_items(wave_id);

        CREATE TABLE IF NOT EXISTS discounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            wave_id INTEGER REFERENCES waves(id) ON DELETE CASCADE,
            campaign_id INTEGER REFERENCES campaigns(id) ON DELETE CASCADE,
            discount_type TEXT NOT NULL CHECK (discount_type IN ('client','agency')),
            discount_percentage REAL NOT NULL
                CHECK (discount_percentage >= 0 AND discount_percentage <= 100),
            CHECK ((wave_id IS NULL) <> (campaign_id IS NULL)),
            UNIQUE (wave_id, discount_type),
            UNIQUE (campaign_id, discount_type)
        );

        CREATE TABLE IF NOT EXISTS trp_distribution (
            wave_id INTEGER NOT NULL REFERENCES waves(id) ON DELETE CASCADE,
            trp_date TEXT NOT NULL,
            trp_value REAL NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (wave_id, trp_date)
        );

        CREATE TABLE IF NOT EXISTS duration_indices (
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            duration_seconds INTEGER NOT NULL,
            index_value REAL NOT NULL DEFAULT 1.0,
            description TEXT,
            PRIMARY KEY (scope_type, scope_key, duration_seconds)
        );

        CREATE TABLE IF NOT EXISTS seasonal_indices (
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            month INTEGER NOT NULL CHECK (month >= 1 AND month <= 12),
            index_value REAL NOT NULL DEFAULT 1.0,
            description TEXT,
            PRIMARY KEY (scope_type, scope_key, month)
        );

        CREATE TABLE IF NOT EXISTS position_indices (
            scope_type TEXT NOT NULL,
            scope_key TEXT NOT NULL,
            position_type TEXT NOT NULL,
            index_value REAL NOT NULL DEFAULT 1.0,
            description TEXT,
            PRIMARY KEY (scope_type, scope_key, position_type)
        );

        CREATE TABLE IF NOT EXISTS rate_cards (
            channel_group TEXT NOT NULL,
            target_group TEXT NOT NULL,
            gross_cpp REAL NOT NULL,
            channel_share REAL,
            pt_zone_share REAL,
            npt_zone_share REAL,
            description TEXT,
            PRIMARY KEY (channel_group, target_group)
        );

        CREATE TABLE IF NOT EXISTS action_log (
            action_id TEXT PRIMARY KEY,
            campaign_id INTEGER,
            wave_id INTEGER,
            action_type TEXT NOT NULL,
            action_ts TEXT NOT NULL,
            actor TEXT NOT NULL,
            payload_json TEXT,
            detail TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_action_log_wave ON action_log(wave_id, action_ts);
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();

        assert_eq!(read_schema_version(&conn).unwrap(), None);

        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        assert_eq!(
            read_schema_version(&conn).unwrap(),
            Some(CURRENT_SCHEMA_VERSION)
        );
    }
}
