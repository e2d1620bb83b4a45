// ==========================================
// 电视广告投放计划系统 - 折扣数据仓储
// ==========================================
// 对齐: discounts 表（wave_id 与 campaign_id 二选一）
// 红线: 每个作用域每种类型至多一条（UNIQUE 约束兜底）
// ==========================================

use crate::domain::discount::{Discount, DiscountScope};
use crate::domain::types::DiscountType;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::traits::DiscountStore;
use async_trait::async_trait;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

pub struct DiscountRepository {
    conn: Arc<Mutex<Connection>>,
}

impl DiscountRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn find_by_scope(&self, scope: DiscountScope) -> RepositoryResult<Vec<Discount>> {
        let conn = self.get_conn()?;
        let (column, id) = scope_column(scope);
        let sql = format!(
            r#"
            SELECT id, wave_id, campaign_id, discount_type, discount_percentage
            FROM discounts WHERE {} = ?1
            ORDER BY id
            "#,
            column
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![id], map_discount_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        // 无法识别的行（非法类型）直接跳过
        Ok(rows.into_iter().flatten().collect())
    }

    pub fn remove(&self, discount_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM discounts WHERE id = ?1", params![discount_id])?;
        if rows == 0 {
            return Err(RepositoryError::not_found("Discount", discount_id));
        }
        Ok(())
    }

    pub fn create(
        &self,
        scope: DiscountScope,
        discount_type: DiscountType,
        percentage: f64,
    ) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let (wave_id, campaign_id) = match scope {
            DiscountScope::Wave(id) => (Some(id), None),
            DiscountScope::Campaign(id) => (None, Some(id)),
        };
        conn.execute(
            r#"
            INSERT INTO discounts (wave_id, campaign_id, discount_type, discount_percentage)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![wave_id, campaign_id, discount_type.as_str(), percentage],
        )?;
        Ok(conn.last_insert_rowid())
    }
}

fn scope_column(scope: DiscountScope) -> (&'static str, i64) {
    match scope {
        DiscountScope::Wave(id) => ("wave_id", id),
        DiscountScope::Campaign(id) => ("campaign_id", id),
    }
}

fn map_discount_row(row: &Row) -> rusqlite::Result<Option<Discount>> {
    let id: i64 = row.get(0)?;
    let wave_id: Option<i64> = row.get(1)?;
    let campaign_id: Option<i64> = row.get(2)?;
    let discount_type: String = row.get(3)?;
    let percentage: f64 = row.get(4)?;

    let scope = match (wave_id, campaign_id) {
        (Some(w), _) => DiscountScope::Wave(w),
        (None, Some(c)) => DiscountScope::Campaign(c),
        (None, None) => return Ok(None),
    };

    Ok(DiscountType::parse(&discount_type).map(|t| Discount {
        id,
        scope,
        discount_type: t,
        percentage,
    }))
}

#[async_trait]
impl DiscountStore for DiscountRepository {
    async fn list_for_wave(&self, wave_id: i64) -> RepositoryResult<Vec<Discount>> {
        self.find_by_scope(DiscountScope::Wave(wave_id))
    }

    async fn list_for_campaign(&self, campaign_id: i64) -> RepositoryResult<Vec<Discount>> {
        self.find_by_scope(DiscountScope::Campaign(campaign_id))
    }

    async fn delete(&self, discount_id: i64) -> RepositoryResult<()> {
        self.remove(discount_id)
    }

    async fn insert(
        &self,
        scope: DiscountScope,
        discount_type: DiscountType,
        percentage: f64,
    ) -> RepositoryResult<i64> {
        self.create(scope, discount_type, percentage)
    }
}
