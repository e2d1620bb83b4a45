// ==========================================
// 电视广告投放计划系统 - 指数目录数据仓储
// ==========================================
// 对齐: duration_indices / seasonal_indices / position_indices 表
// 作用域: (scope_type, scope_key)，见 IndexScope
// ==========================================

use crate::domain::index_catalog::{DurationIndexEntry, PositionIndexEntry, SeasonalIndexEntry};
use crate::domain::types::{IndexScope, PositionType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::traits::IndexCatalogStore;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

pub struct IndexCatalogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl IndexCatalogRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 查询
    // ==========================================

    pub fn find_duration_indices(
        &self,
        scope: &IndexScope,
    ) -> RepositoryResult<Vec<DurationIndexEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT duration_seconds, index_value, description
            FROM duration_indices
            WHERE scope_type = ?1 AND scope_key = ?2
            ORDER BY duration_seconds
            "#,
        )?;
        let entries = stmt
            .query_map(params![scope.scope_type(), scope.scope_key()], |row| {
                Ok(DurationIndexEntry {
                    scope: scope.clone(),
                    duration_seconds: row.get(0)?,
                    index_value: row.get(1)?,
                    description: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    pub fn find_seasonal_index(
        &self,
        scope: &IndexScope,
        month: u32,
    ) -> RepositoryResult<Option<SeasonalIndexEntry>> {
        let conn = self.get_conn()?;
        let entry = conn
            .query_row(
                r#"
                SELECT index_value, description FROM seasonal_indices
                WHERE scope_type = ?1 AND scope_key = ?2 AND month = ?3
                "#,
                params![scope.scope_type(), scope.scope_key(), month],
                |row| {
                    Ok(SeasonalIndexEntry {
                        scope: scope.clone(),
                        month,
                        index_value: row.get(0)?,
                        description: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(entry)
    }

    pub fn find_position_index(
        &self,
        scope: &IndexScope,
        position_type: PositionType,
    ) -> RepositoryResult<Option<PositionIndexEntry>> {
        let conn = self.get_conn()?;
        let entry = conn
            .query_row(
                r#"
                SELECT index_value, description FROM position_indices
                WHERE scope_type = ?1 AND scope_key = ?2 AND position_type = ?3
                "#,
                params![scope.scope_type(), scope.scope_key(), position_type.as_str()],
                |row| {
                    Ok(PositionIndexEntry {
                        scope: scope.clone(),
                        position_type,
                        index_value: row.get(0)?,
                        description: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(entry)
    }

    // ==========================================
    // 维护（初始化脚本使用）
    // ==========================================

    pub fn upsert_duration_index(&self, entry: &DurationIndexEntry) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO duration_indices (scope_type, scope_key, duration_seconds, index_value, description)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(scope_type, scope_key, duration_seconds) DO UPDATE SET
                index_value = excluded.index_value,
                description = excluded.description
            "#,
            params![
                entry.scope.scope_type(),
                entry.scope.scope_key(),
                entry.duration_seconds,
                entry.index_value,
                entry.description,
            ],
        )?;
        Ok(())
    }

    pub fn upsert_seasonal_index(&self, entry: &SeasonalIndexEntry) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO seasonal_indices (scope_type, scope_key, month, index_value, description)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(scope_type, scope_key, month) DO UPDATE SET
                index_value = excluded.index_value,
                description = excluded.description
            "#,
            params![
                entry.scope.scope_type(),
                entry.scope.scope_key(),
                entry.month,
                entry.index_value,
                entry.description,
            ],
        )?;
        Ok(())
    }

    pub fn upsert_position_index(&self, entry: &PositionIndexEntry) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO position_indices (scope_type, scope_key, position_type, index_value, description)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(scope_type, scope_key, position_type) DO UPDATE SET
                index_value = excluded.index_value,
                description = excluded.description
            "#,
            params![
                entry.scope.scope_type(),
                entry.scope.scope_key(),
                entry.position_type.as_str(),
                entry.index_value,
                entry.description,
            ],
        )?;
        Ok(())
    }
}

#[async_trait]
impl IndexCatalogStore for IndexCatalogRepository {
    async fn duration_indices(
        &self,
        scope: &IndexScope,
    ) -> RepositoryResult<Vec<DurationIndexEntry>> {
        self.find_duration_indices(scope)
    }

    async fn seasonal_index(
        &self,
        scope: &IndexScope,
        month: u32,
    ) -> RepositoryResult<Option<SeasonalIndexEntry>> {
        self.find_seasonal_index(scope, month)
    }

    async fn position_index(
        &self,
        scope: &IndexScope,
        position_type: PositionType,
    ) -> RepositoryResult<Option<PositionIndexEntry>> {
        self.find_position_index(scope, position_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, ensure_schema};

    fn setup() -> IndexCatalogRepository {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        IndexCatalogRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_scopes_are_isolated() {
        let repo = setup();
        let amb = IndexScope::ChannelGroup("AMB Baltics".to_string());
        let legacy = IndexScope::TargetGroup("AMB Baltics".to_string());

        repo.upsert_seasonal_index(&SeasonalIndexEntry {
            scope: amb.clone(),
            month: 3,
            index_value: 1.5,
            description: None,
        })
        .unwrap();

        assert_eq!(
            repo.find_seasonal_index(&amb, 3).unwrap().map(|e| e.index_value),
            Some(1.5)
        );
        assert!(repo.find_seasonal_index(&legacy, 3).unwrap().is_none());
    }

    #[test]
    fn test_upsert_overwrites_value() {
        let repo = setup();
        let scope = IndexScope::ChannelGroup("MG grupė".to_string());
        for value in [1.3, 1.5] {
            repo.upsert_position_index(&PositionIndexEntry {
                scope: scope.clone(),
                position_type: PositionType::First,
                index_value: value,
                description: Some("first".to_string()),
            })
            .unwrap();
        }

        let entry = repo
            .find_position_index(&scope, PositionType::First)
            .unwrap()
            .unwrap();
        assert_eq!(entry.index_value, 1.5);
    }
}
