// ==========================================
// 电视广告投放计划系统 - 投放明细数据仓储
// ==========================================
// 对齐: wave_items 表
// 红线: Repository 不含业务逻辑（不计价），只做数据映射
// ==========================================

use crate::domain::discount::WaveCost;
use crate::domain::line_item::LineItem;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::traits::LineItemStore;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT id, wave_id, channel_group, target_group, tvc_id, clip_duration,
           trp, affinity1, affinity2, channel_share, pt_zone_share, npt_zone_share,
           gross_cpp, duration_index, seasonal_index, trp_purchase_index,
           advance_purchase_index, position_index, web_index,
           advance_payment_index, loyalty_discount_index,
           client_discount_percent, agency_discount_percent,
           grp, gross_price, net_price, net_net_price
    FROM wave_items
"#;

// ==========================================
// LineItemRepository
// ==========================================
pub struct LineItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LineItemRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<LineItem>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let item = conn
            .query_row(&sql, params![id], map_line_item_row)
            .optional()?;
        Ok(item)
    }

    pub fn find_by_wave(&self, wave_id: i64) -> RepositoryResult<Vec<LineItem>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE wave_id = ?1 ORDER BY id", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![wave_id], map_line_item_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    /// 插入明细，返回新 id（忽略 item.id）
    pub fn insert(&self, item: &LineItem) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO wave_items (
                wave_id, channel_group, target_group, tvc_id, clip_duration,
                trp, affinity1, affinity2, channel_share, pt_zone_share, npt_zone_share,
                gross_cpp, duration_index, seasonal_index, trp_purchase_index,
                advance_purchase_index, position_index, web_index,
                advance_payment_index, loyalty_discount_index,
                client_discount_percent, agency_discount_percent,
                grp, gross_price, net_price, net_net_price
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                      ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26)
            "#,
            params![
                item.wave_id,
                item.channel_group,
                item.target_group,
                item.tvc_id,
                item.clip_duration,
                item.trp,
                item.affinity1,
                item.affinity2,
                item.channel_share,
                item.pt_zone_share,
                item.npt_zone_share,
                item.gross_cpp,
                item.duration_index,
                item.seasonal_index,
                item.trp_purchase_index,
                item.advance_purchase_index,
                item.position_index,
                item.web_index,
                item.advance_payment_index,
                item.loyalty_discount_index,
                item.client_discount_percent,
                item.agency_discount_percent,
                item.grp,
                item.gross_price,
                item.net_price,
                item.net_net_price,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 整行覆盖写
    pub fn update(&self, item: &LineItem) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE wave_items SET
                channel_group = ?2, target_group = ?3, tvc_id = ?4, clip_duration = ?5,
                trp = ?6, affinity1 = ?7, affinity2 = ?8, channel_share = ?9,
                pt_zone_share = ?10, npt_zone_share = ?11, gross_cpp = ?12,
                duration_index = ?13, seasonal_index = ?14, trp_purchase_index = ?15,
                advance_purchase_index = ?16, position_index = ?17, web_index = ?18,
                advance_payment_index = ?19, loyalty_discount_index = ?20,
                client_discount_percent = ?21, agency_discount_percent = ?22,
                grp = ?23, gross_price = ?24, net_price = ?25, net_net_price = ?26,
                updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                item.id,
                item.channel_group,
                item.target_group,
                item.tvc_id,
                item.clip_duration,
                item.trp,
                item.affinity1,
                item.affinity2,
                item.channel_share,
                item.pt_zone_share,
                item.npt_zone_share,
                item.gross_cpp,
                item.duration_index,
                item.seasonal_index,
                item.trp_purchase_index,
                item.advance_purchase_index,
                item.position_index,
                item.web_index,
                item.advance_payment_index,
                item.loyalty_discount_index,
                item.client_discount_percent,
                item.agency_discount_percent,
                item.grp,
                item.gross_price,
                item.net_price,
                item.net_net_price,
            ],
        )?;
        if rows == 0 {
            return Err(RepositoryError::not_found("LineItem", item.id));
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM wave_items WHERE id = ?1", params![id])?;
        if rows == 0 {
            return Err(RepositoryError::not_found("LineItem", id));
        }
        Ok(())
    }

    pub fn count_for_wave(&self, wave_id: i64) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM wave_items WHERE wave_id = ?1",
            params![wave_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// 汇总波段金额
    pub fn sum_wave_cost(&self, wave_id: i64) -> RepositoryResult<WaveCost> {
        let conn = self.get_conn()?;
        let (base, client, agency): (f64, f64, f64) = conn.query_row(
            r#"
            SELECT COALESCE(SUM(gross_price), 0),
                   COALESCE(SUM(net_price), 0),
                   COALESCE(SUM(net_net_price), 0)
            FROM wave_items WHERE wave_id = ?1
            "#,
            params![wave_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        Ok(WaveCost {
            wave_id,
            base_cost: base,
            client_cost: client,
            agency_cost: agency,
            ..WaveCost::default()
        })
    }
}

fn map_line_item_row(row: &Row) -> rusqlite::Result<LineItem> {
    Ok(LineItem {
        id: row.get(0)?,
        wave_id: row.get(1)?,
        channel_group: row.get(2)?,
        target_group: row.get(3)?,
        tvc_id: row.get(4)?,
        clip_duration: row.get(5)?,
        trp: row.get(6)?,
        affinity1: row.get(7)?,
        affinity2: row.get(8)?,
        channel_share: row.get(9)?,
        pt_zone_share: row.get(10)?,
        npt_zone_share: row.get(11)?,
        gross_cpp: row.get(12)?,
        duration_index: row.get(13)?,
        seasonal_index: row.get(14)?,
        trp_purchase_index: row.get(15)?,
        advance_purchase_index: row.get(16)?,
        position_index: row.get(17)?,
        web_index: row.get(18)?,
        advance_payment_index: row.get(19)?,
        loyalty_discount_index: row.get(20)?,
        client_discount_percent: row.get(21)?,
        agency_discount_percent: row.get(22)?,
        grp: row.get(23)?,
        gross_price: row.get(24)?,
        net_price: row.get(25)?,
        net_net_price: row.get(26)?,
    })
}

#[async_trait]
impl LineItemStore for LineItemRepository {
    async fn get_line_item(&self, id: i64) -> RepositoryResult<Option<LineItem>> {
        self.find_by_id(id)
    }

    async fn list_by_wave(&self, wave_id: i64) -> RepositoryResult<Vec<LineItem>> {
        self.find_by_wave(wave_id)
    }

    async fn insert_line_item(&self, item: &LineItem) -> RepositoryResult<i64> {
        self.insert(item)
    }

    async fn update_line_item(&self, item: &LineItem) -> RepositoryResult<()> {
        self.update(item)
    }

    async fn delete_line_item(&self, id: i64) -> RepositoryResult<()> {
        self.delete(id)
    }

    async fn count_by_wave(&self, wave_id: i64) -> RepositoryResult<usize> {
        self.count_for_wave(wave_id)
    }

    async fn wave_cost(&self, wave_id: i64) -> RepositoryResult<WaveCost> {
        self.sum_wave_cost(wave_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{configure_sqlite_connection, ensure_schema};

    fn setup() -> (LineItemRepository, i64) {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        conn.execute("INSERT INTO campaigns (name) VALUES ('c')", [])
            .unwrap();
        conn.execute("INSERT INTO waves (campaign_id, name) VALUES (1, 'w')", [])
            .unwrap();
        (
            LineItemRepository::from_connection(Arc::new(Mutex::new(conn))),
            1,
        )
    }

    #[test]
    fn test_missing_inputs_stay_null() {
        let (repo, wave_id) = setup();
        let mut item = LineItem::blank(wave_id, "AMB Baltics", "A25-55");
        item.trp = Some(120.0);
        let id = repo.insert(&item).unwrap();

        let loaded = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(loaded.trp, Some(120.0));
        assert_eq!(loaded.gross_cpp, None);
        assert_eq!(loaded.seasonal_index, None);
    }

    #[test]
    fn test_wave_cost_sums_prices() {
        let (repo, wave_id) = setup();
        for (g, n, nn) in [(1000.0, 800.0, 720.0), (500.0, 400.0, 360.0)] {
            let mut item = LineItem::blank(wave_id, "MG grupė", "A18+");
            item.gross_price = g;
            item.net_price = n;
            item.net_net_price = nn;
            repo.insert(&item).unwrap();
        }

        let cost = repo.sum_wave_cost(wave_id).unwrap();
        assert_eq!(cost.base_cost, 1500.0);
        assert_eq!(cost.client_cost, 1200.0);
        assert_eq!(cost.agency_cost, 1080.0);
        assert_eq!(repo.count_for_wave(wave_id).unwrap(), 2);
        assert_eq!(repo.sum_wave_cost(999).unwrap().base_cost, 0.0);
    }

    #[test]
    fn test_update_unknown_item_is_not_found() {
        let (repo, wave_id) = setup();
        let mut item = LineItem::blank(wave_id, "x", "y");
        item.id = 42;
        assert!(matches!(
            repo.update(&item),
            Err(RepositoryError::NotFound { .. })
        ));
    }
}
