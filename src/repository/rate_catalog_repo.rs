// ==========================================
// 电视广告投放计划系统 - 价目表数据仓储
// ==========================================
// 对齐: rate_cards 表
// 主键: (channel_group, target_group)
// ==========================================

use crate::domain::index_catalog::RateCardEntry;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::traits::RateCatalogStore;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct RateCatalogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl RateCatalogRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn find_rate_card(
        &self,
        channel_group: &str,
        target_group: &str,
    ) -> RepositoryResult<Option<RateCardEntry>> {
        let conn = self.get_conn()?;
        let entry = conn
            .query_row(
                r#"
                SELECT gross_cpp, channel_share, pt_zone_share, npt_zone_share, description
                FROM rate_cards
                WHERE channel_group = ?1 AND target_group = ?2
                "#,
                params![channel_group.trim(), target_group.trim()],
                |row| {
                    Ok(RateCardEntry {
                        channel_group: channel_group.trim().to_string(),
                        target_group: target_group.trim().to_string(),
                        gross_cpp: row.get(0)?,
                        channel_share: row.get(1)?,
                        pt_zone_share: row.get(2)?,
                        npt_zone_share: row.get(3)?,
                        description: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(entry)
    }

    /// 维护（初始化脚本使用）
    pub fn upsert_rate_card(&self, entry: &RateCardEntry) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO rate_cards (
                channel_group, target_group, gross_cpp,
                channel_share, pt_zone_share, npt_zone_share, description
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(channel_group, target_group) DO UPDATE SET
                gross_cpp = excluded.gross_cpp,
                channel_share = excluded.channel_share,
                pt_zone_share = excluded.pt_zone_share,
                npt_zone_share = excluded.npt_zone_share,
                description = excluded.description
            "#,
            params![
                entry.channel_group.trim(),
                entry.target_group.trim(),
                entry.gross_cpp,
                entry.channel_share,
                entry.pt_zone_share,
                entry.npt_zone_share,
                entry.description,
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl RateCatalogStore for RateCatalogRepository {
    async fn rate_card(
        &self,
        channel_group: &str,
        target_group: &str,
    ) -> RepositoryResult<Option<RateCardEntry>> {
        self.find_rate_card(channel_group, target_group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, ensure_schema};

    fn setup() -> RateCatalogRepository {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        RateCatalogRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn entry(target_group: &str, gross_cpp: f64) -> RateCardEntry {
        RateCardEntry {
            channel_group: "AMB Baltics".to_string(),
            target_group: target_group.to_string(),
            gross_cpp,
            channel_share: Some(0.8),
            pt_zone_share: Some(0.6),
            npt_zone_share: None,
            description: None,
        }
    }

    #[test]
    fn test_lookup_is_keyed_by_group_pair() {
        let repo = setup();
        repo.upsert_rate_card(&entry("A25-55", 18.4)).unwrap();

        let hit = repo.find_rate_card("AMB Baltics", " A25-55 ").unwrap().unwrap();
        assert_eq!(hit.gross_cpp, 18.4);
        assert_eq!(hit.channel_share, Some(0.8));
        assert_eq!(hit.npt_zone_share, None);

        assert!(repo.find_rate_card("AMB Baltics", "W30+").unwrap().is_none());
        assert!(repo.find_rate_card("MG grupė", "A25-55").unwrap().is_none());
    }

    #[test]
    fn test_upsert_overwrites_rate() {
        let repo = setup();
        repo.upsert_rate_card(&entry("A25-55", 18.4)).unwrap();
        repo.upsert_rate_card(&entry("A25-55", 21.0)).unwrap();

        let hit = repo.find_rate_card("AMB Baltics", "A25-55").unwrap().unwrap();
        assert_eq!(hit.gross_cpp, 21.0);
    }
}
