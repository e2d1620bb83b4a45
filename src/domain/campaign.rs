// ==========================================
// 电视广告投放计划系统 - 活动/波段/素材领域模型
// ==========================================
// 层级: Campaign → Wave → LineItem
// 说明: 活动/波段的增删改属于外部 CRUD 层，这里只定义核心所需的形状
// ==========================================

use crate::domain::types::CampaignStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// Campaign - 广告活动
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    pub client: Option<String>,
    pub agency: Option<String>,
    pub product: Option<String>,
    pub country: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: CampaignStatus,
}

// ==========================================
// Wave - 投放波段
// ==========================================
// 日期范围预期包含于活动日期范围内，但不做强制校验
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wave {
    pub id: i64,
    pub campaign_id: i64,
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Wave {
    /// 波段有效天数（含首尾）
    ///
    /// 日期缺失或起止倒置时返回 0
    pub fn day_count(&self) -> i64 {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end >= start => (end - start).num_days() + 1,
            _ => 0,
        }
    }

    /// 波段内的全部日期（升序）
    pub fn active_days(&self) -> Vec<NaiveDate> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if end >= start => start
                .iter_days()
                .take_while(|d| *d <= end)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// 日期是否落在波段范围内
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => date >= start && date <= end,
            _ => false,
        }
    }

    /// 展示名称（未命名波段使用 id）
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(n) if !n.trim().is_empty() => n.clone(),
            _ => format!("wave#{}", self.id),
        }
    }
}

// ==========================================
// Tvc - 电视广告素材
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tvc {
    pub id: i64,
    pub campaign_id: i64,
    pub name: String,
    pub duration_seconds: i32,
}
