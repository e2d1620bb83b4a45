// ==========================================
// 电视广告投放计划系统 - 领域类型定义
// ==========================================
// 序列化格式与数据库存储保持一致（snake_case 文本）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 活动状态 (Campaign Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,      // 草稿
    Confirmed,  // 已确认
    OrdersSent, // 订单已发送
    Active,     // 投放中
    Completed,  // 已完成
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Confirmed => "confirmed",
            CampaignStatus::OrdersSent => "orders_sent",
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
        }
    }

    /// 从数据库文本解析；未知值按草稿处理
    pub fn from_str(s: &str) -> Self {
        match s.trim() {
            "confirmed" => CampaignStatus::Confirmed,
            "orders_sent" => CampaignStatus::OrdersSent,
            "active" => CampaignStatus::Active,
            "completed" => CampaignStatus::Completed,
            _ => CampaignStatus::Draft,
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 折扣类型 (Discount Type)
// ==========================================
// client: 客户折扣（Gross → Net）
// agency: 代理折扣（Net → Net-Net）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Client,
    Agency,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Client => "client",
            DiscountType::Agency => "agency",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "client" => Some(DiscountType::Client),
            "agency" => Some(DiscountType::Agency),
            _ => None,
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 指数目录作用域 (Index Scope)
// ==========================================
// 目录历史上先按目标群体维护，后迁移为按频道组维护；两种形态并存
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope_type", content = "scope_key", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexScope {
    ChannelGroup(String),
    TargetGroup(String),
}

impl IndexScope {
    pub fn scope_type(&self) -> &'static str {
        match self {
            IndexScope::ChannelGroup(_) => "CHANNEL_GROUP",
            IndexScope::TargetGroup(_) => "TARGET_GROUP",
        }
    }

    pub fn scope_key(&self) -> &str {
        match self {
            IndexScope::ChannelGroup(k) | IndexScope::TargetGroup(k) => k,
        }
    }

    pub fn from_parts(scope_type: &str, scope_key: &str) -> Option<Self> {
        match scope_type {
            "CHANNEL_GROUP" => Some(IndexScope::ChannelGroup(scope_key.to_string())),
            "TARGET_GROUP" => Some(IndexScope::TargetGroup(scope_key.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for IndexScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope_type(), self.scope_key())
    }
}

// ==========================================
// 广告位位置类型 (Position Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionType {
    First,  // 首位
    Second, // 第二位
    Last,   // 末位
    Other,  // 其他特殊位置
}

impl PositionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionType::First => "first",
            PositionType::Second => "second",
            PositionType::Last => "last",
            PositionType::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "first" => Some(PositionType::First),
            "second" => Some(PositionType::Second),
            "last" => Some(PositionType::Last),
            "other" => Some(PositionType::Other),
            _ => None,
        }
    }
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// GRP 公式 (GRP Formula)
// ==========================================
// 两套公式在系统演进中并存，不合并
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GrpFormula {
    /// GRP = trp × channel_share × pt_zone_share
    ShareBased,
    /// GRP = trp × 100 / affinity1
    AffinityBased,
}

impl fmt::Display for GrpFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrpFormula::ShareBased => write!(f, "SHARE_BASED"),
            GrpFormula::AffinityBased => write!(f, "AFFINITY_BASED"),
        }
    }
}

/// GRP 公式选择策略（配置项 pricing/grp_formula）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GrpFormulaSelection {
    /// affinity1 > 0 时按 affinity 公式，否则按份额公式
    #[default]
    Auto,
    /// 强制份额公式
    Share,
    /// 强制 affinity 公式（affinity1 缺失或为 0 时 GRP = 0）
    Affinity,
}

impl GrpFormulaSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrpFormulaSelection::Auto => "auto",
            GrpFormulaSelection::Share => "share",
            GrpFormulaSelection::Affinity => "affinity",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(GrpFormulaSelection::Auto),
            "share" | "share_based" => Some(GrpFormulaSelection::Share),
            "affinity" | "affinity_based" => Some(GrpFormulaSelection::Affinity),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_status_round_trip_text() {
        for status in [
            CampaignStatus::Draft,
            CampaignStatus::Confirmed,
            CampaignStatus::OrdersSent,
            CampaignStatus::Active,
            CampaignStatus::Completed,
        ] {
            assert_eq!(CampaignStatus::from_str(status.as_str()), status);
        }
        assert_eq!(CampaignStatus::from_str("garbage"), CampaignStatus::Draft);
    }

    #[test]
    fn test_index_scope_parts() {
        let scope = IndexScope::ChannelGroup("AMB Baltics".to_string());
        assert_eq!(scope.scope_type(), "CHANNEL_GROUP");
        assert_eq!(
            IndexScope::from_parts(scope.scope_type(), scope.scope_key()),
            Some(scope)
        );
        assert_eq!(IndexScope::from_parts("OWNER", "x"), None);
    }

    #[test]
    fn test_grp_formula_selection_parse() {
        assert_eq!(GrpFormulaSelection::parse(" Share "), Some(GrpFormulaSelection::Share));
        assert_eq!(
            GrpFormulaSelection::parse("affinity_based"),
            Some(GrpFormulaSelection::Affinity)
        );
        assert_eq!(GrpFormulaSelection::parse("nope"), None);
    }
}
