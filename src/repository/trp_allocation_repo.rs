// ==========================================
// 电视广告投放计划系统 - TRP 日分配数据仓储
// ==========================================
// 对齐: trp_distribution 表，主键 (wave_id, trp_date)
// ==========================================

use crate::domain::trp_allocation::DailyTrpMap;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_mapping::{format_date, parse_date_opt};
use crate::repository::traits::TrpAllocationStore;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

pub struct TrpAllocationRepository {
    conn: Arc<Mutex<Connection>>,
}

impl TrpAllocationRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn find_by_wave(&self, wave_id: i64) -> RepositoryResult<DailyTrpMap> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT trp_date, trp_value FROM trp_distribution WHERE wave_id = ?1 ORDER BY trp_date",
        )?;
        let rows = stmt
            .query_map(params![wave_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut days = DailyTrpMap::new();
        for (raw_date, value) in rows {
            match parse_date_opt(Some(raw_date.clone())) {
                Some(date) => {
                    days.insert(date, value);
                }
                None => tracing::warn!(wave_id, raw_date = %raw_date, "跳过无法解析的 TRP 日期"),
            }
        }
        Ok(days)
    }

    /// 逐日 upsert（单事务）
    pub fn upsert(&self, wave_id: i64, days: &DailyTrpMap) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO trp_distribution (wave_id, trp_date, trp_value, updated_at)
                VALUES (?1, ?2, ?3, datetime('now'))
                ON CONFLICT(wave_id, trp_date) DO UPDATE SET
                    trp_value = excluded.trp_value,
                    updated_at = excluded.updated_at
                "#,
            )?;
            for (date, value) in days {
                stmt.execute(params![wave_id, format_date(*date), value])?;
                count += 1;
            }
        }

        tx.commit()?;
        Ok(count)
    }
}

#[async_trait]
impl TrpAllocationStore for TrpAllocationRepository {
    async fn load(&self, wave_id: i64) -> RepositoryResult<DailyTrpMap> {
        self.find_by_wave(wave_id)
    }

    async fn upsert_days(&self, wave_id: i64, days: &DailyTrpMap) -> RepositoryResult<usize> {
        self.upsert(wave_id, days)
    }
}
