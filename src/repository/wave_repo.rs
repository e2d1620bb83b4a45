// ==========================================
// 电视广告投放计划系统 - 活动/波段/素材数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑,只做数据映射
// 说明: 活动与波段的完整 CRUD 属于外部管理界面，
//       这里只提供核心命令与初始化脚本需要的部分
// ==========================================

use crate::domain::campaign::{Campaign, Tvc, Wave};
use crate::domain::types::CampaignStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::row_mapping::{format_date_opt, parse_date_opt};
use crate::repository::traits::WaveStore;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// WaveRepository
// ==========================================
pub struct WaveRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WaveRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 活动
    // ==========================================

    /// 新建活动，返回 id
    pub fn insert_campaign(&self, campaign: &Campaign) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO campaigns (name, client, agency, product, country,
                                   start_date, end_date, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                campaign.name,
                campaign.client,
                campaign.agency,
                campaign.product,
                campaign.country,
                format_date_opt(campaign.start_date),
                format_date_opt(campaign.end_date),
                campaign.status.as_str(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_campaign(&self, campaign_id: i64) -> RepositoryResult<Option<Campaign>> {
        let conn = self.get_conn()?;
        let campaign = conn
            .query_row(
                r#"
                SELECT id, name, client, agency, product, country,
                       start_date, end_date, status
                FROM campaigns WHERE id = ?1
                "#,
                params![campaign_id],
                |row| {
                    Ok(Campaign {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        client: row.get(2)?,
                        agency: row.get(3)?,
                        product: row.get(4)?,
                        country: row.get(5)?,
                        start_date: parse_date_opt(row.get(6)?),
                        end_date: parse_date_opt(row.get(7)?),
                        status: CampaignStatus::from_str(&row.get::<_, String>(8)?),
                    })
                },
            )
            .optional()?;
        Ok(campaign)
    }

    // ==========================================
    // 波段
    // ==========================================

    /// 新建波段，返回 id
    pub fn insert_wave(&self, wave: &Wave) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO waves (campaign_id, name, start_date, end_date) VALUES (?1, ?2, ?3, ?4)",
            params![
                wave.campaign_id,
                wave.name,
                format_date_opt(wave.start_date),
                format_date_opt(wave.end_date),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_wave(&self, wave_id: i64) -> RepositoryResult<Option<Wave>> {
        let conn = self.get_conn()?;
        let wave = conn
            .query_row(
                "SELECT id, campaign_id, name, start_date, end_date FROM waves WHERE id = ?1",
                params![wave_id],
                map_wave_row,
            )
            .optional()?;
        Ok(wave)
    }

    pub fn find_waves_by_campaign(&self, campaign_id: i64) -> RepositoryResult<Vec<Wave>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, campaign_id, name, start_date, end_date
            FROM waves WHERE campaign_id = ?1
            ORDER BY id
            "#,
        )?;
        let waves = stmt
            .query_map(params![campaign_id], map_wave_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(waves)
    }

    pub fn remove_wave(&self, wave_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM waves WHERE id = ?1", params![wave_id])?;
        if rows == 0 {
            return Err(RepositoryError::not_found("Wave", wave_id));
        }
        Ok(())
    }

    // ==========================================
    // 素材
    // ==========================================

    pub fn insert_tvc(&self, tvc: &Tvc) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO tvcs (campaign_id, name, duration) VALUES (?1, ?2, ?3)",
            params![tvc.campaign_id, tvc.name, tvc.duration_seconds],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_tvc(&self, tvc_id: i64) -> RepositoryResult<Option<Tvc>> {
        let conn = self.get_conn()?;
        let tvc = conn
            .query_row(
                "SELECT id, campaign_id, name, duration FROM tvcs WHERE id = ?1",
                params![tvc_id],
                |row| {
                    Ok(Tvc {
                        id: row.get(0)?,
                        campaign_id: row.get(1)?,
                        name: row.get(2)?,
                        duration_seconds: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(tvc)
    }
}

fn map_wave_row(row: &Row) -> rusqlite::Result<Wave> {
    Ok(Wave {
        id: row.get(0)?,
        campaign_id: row.get(1)?,
        name: row.get(2)?,
        start_date: parse_date_opt(row.get(3)?),
        end_date: parse_date_opt(row.get(4)?),
    })
}

#[async_trait]
impl WaveStore for WaveRepository {
    async fn get_wave(&self, wave_id: i64) -> RepositoryResult<Option<Wave>> {
        self.find_wave(wave_id)
    }

    async fn list_waves_by_campaign(&self, campaign_id: i64) -> RepositoryResult<Vec<Wave>> {
        self.find_waves_by_campaign(campaign_id)
    }

    async fn delete_wave(&self, wave_id: i64) -> RepositoryResult<()> {
        self.remove_wave(wave_id)
    }

    async fn get_tvc(&self, tvc_id: i64) -> RepositoryResult<Option<Tvc>> {
        self.find_tvc(tvc_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, ensure_schema};
    use chrono::NaiveDate;

    fn setup() -> WaveRepository {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        WaveRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn campaign() -> Campaign {
        Campaign {
            id: 0,
            name: "Spring".to_string(),
            client: Some("ACME".to_string()),
            agency: None,
            product: None,
            country: Some("LT".to_string()),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 31),
            status: CampaignStatus::Confirmed,
        }
    }

    #[test]
    fn test_campaign_and_wave_round_trip() {
        let repo = setup();
        let campaign_id = repo.insert_campaign(&campaign()).unwrap();
        let loaded = repo.find_campaign(campaign_id).unwrap().unwrap();
        assert_eq!(loaded.status, CampaignStatus::Confirmed);
        assert_eq!(loaded.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));

        let wave_id = repo
            .insert_wave(&Wave {
                id: 0,
                campaign_id,
                name: Some("W1".to_string()),
                start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
                end_date: NaiveDate::from_ymd_opt(2024, 3, 10),
            })
            .unwrap();

        let waves = repo.find_waves_by_campaign(campaign_id).unwrap();
        assert_eq!(waves.len(), 1);
        assert_eq!(waves[0].id, wave_id);
        assert_eq!(waves[0].day_count(), 10);

        repo.remove_wave(wave_id).unwrap();
        assert!(repo.find_wave(wave_id).unwrap().is_none());
        assert!(matches!(
            repo.remove_wave(wave_id),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_tvc_requires_existing_campaign() {
        let repo = setup();
        let err = repo
            .insert_tvc(&Tvc {
                id: 0,
                campaign_id: 999,
                name: "spot".to_string(),
                duration_seconds: 20,
            })
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
    }
}
