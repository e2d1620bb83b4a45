// ==========================================
// 电视广告投放计划系统 - TRP 日分配领域模型
// ==========================================
// 说明: “日值之和 ≈ 波段总 TRP” 是设计目标而非约束，
//       人工编辑可以打破该关系
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单个波段的日分配（日期 → TRP）
pub type DailyTrpMap = BTreeMap<NaiveDate, f64>;

// ==========================================
// WaveTrpAllocation - 波段日分配
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveTrpAllocation {
    pub wave_id: i64,
    pub days: DailyTrpMap,
}

impl WaveTrpAllocation {
    pub fn total(&self) -> f64 {
        self.days.values().sum()
    }
}

// ==========================================
// WaveDayValue - 活动视图中的单元格
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveDayValue {
    pub wave_id: i64,
    pub wave_name: String,
    pub value: f64,
}

// ==========================================
// CampaignTrpView - 活动级 TRP 视图
// ==========================================
// 各波段独立组合；同一天多个波段并列展示，不做冲突消解
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignTrpView {
    pub campaign_id: i64,
    pub waves: Vec<WaveTrpAllocation>,
    pub by_day: BTreeMap<NaiveDate, Vec<WaveDayValue>>,
}

impl CampaignTrpView {
    /// 某日所有波段的 TRP 合计
    pub fn total_for_day(&self, date: NaiveDate) -> f64 {
        self.by_day
            .get(&date)
            .map(|cells| cells.iter().map(|c| c.value).sum())
            .unwrap_or(0.0)
    }

    /// 同一天有多个波段占用的日期
    pub fn overlapping_days(&self) -> Vec<NaiveDate> {
        self.by_day
            .iter()
            .filter(|(_, cells)| cells.len() > 1)
            .map(|(d, _)| *d)
            .collect()
    }
}
