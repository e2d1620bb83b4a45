// ==========================================
// 电视广告投放计划系统 - 投放明细领域模型
// ==========================================
// 红线: 所有数值输入均可缺失（None），计价时替换为约定默认值，
//       计价永不因输入缺失而中断
// ==========================================

use crate::domain::types::{GrpFormula, PositionType};
use serde::{Deserialize, Serialize};

// ==========================================
// LineItem - 波段投放明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    // ===== 主键与归属 =====
    pub id: i64,
    pub wave_id: i64,

    // ===== 购买对象 =====
    pub channel_group: String,   // 频道组（旧称 owner）
    pub target_group: String,    // 目标群体
    pub tvc_id: Option<i64>,     // 关联素材（可选）
    pub clip_duration: Option<f64>, // 素材时长（秒），有 TVC 时以 TVC 为准

    // ===== 购买量与受众 =====
    pub trp: Option<f64>,
    pub affinity1: Option<f64>,
    pub affinity2: Option<f64>,
    pub channel_share: Option<f64>,
    pub pt_zone_share: Option<f64>,
    pub npt_zone_share: Option<f64>,

    // ===== 价格与指数 =====
    pub gross_cpp: Option<f64>, // 每点每秒基础价
    pub duration_index: Option<f64>,
    pub seasonal_index: Option<f64>,
    pub trp_purchase_index: Option<f64>,
    pub advance_purchase_index: Option<f64>,
    pub position_index: Option<f64>,
    pub web_index: Option<f64>,
    pub advance_payment_index: Option<f64>,
    pub loyalty_discount_index: Option<f64>,

    // ===== 折扣（由波段折扣下发，已钳制到 [0,100]）=====
    pub client_discount_percent: f64,
    pub agency_discount_percent: f64,

    // ===== 计价结果（最近一次计算）=====
    pub grp: f64,
    pub gross_price: f64,
    pub net_price: f64,
    pub net_net_price: f64,
}

impl LineItem {
    /// 创建空白明细（所有数值输入缺失，计价结果为 0）
    pub fn blank(wave_id: i64, channel_group: &str, target_group: &str) -> Self {
        Self {
            id: 0,
            wave_id,
            channel_group: channel_group.to_string(),
            target_group: target_group.to_string(),
            tvc_id: None,
            clip_duration: None,
            trp: None,
            affinity1: None,
            affinity2: None,
            channel_share: None,
            pt_zone_share: None,
            npt_zone_share: None,
            gross_cpp: None,
            duration_index: None,
            seasonal_index: None,
            trp_purchase_index: None,
            advance_purchase_index: None,
            position_index: None,
            web_index: None,
            advance_payment_index: None,
            loyalty_discount_index: None,
            client_discount_percent: 0.0,
            agency_discount_percent: 0.0,
            grp: 0.0,
            gross_price: 0.0,
            net_price: 0.0,
            net_net_price: 0.0,
        }
    }

    /// 写回计价结果
    pub fn apply_pricing(&mut self, result: &PricingResult) {
        self.grp = result.grp;
        self.gross_price = result.gross_price;
        self.net_price = result.net_price;
        self.net_net_price = result.net_net_price;
    }
}

// ==========================================
// PricingResult - 计价结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub grp: f64,
    pub gross_price: f64,
    pub net_price: f64,
    pub net_net_price: f64,
    /// 实际采用的 GRP 公式（可解释性）
    pub grp_formula: GrpFormula,
}

// ==========================================
// LineItemPatch - 明细原始输入补丁
// ==========================================
// 外部表单以文本提交数值（可能带 €、%、逗号小数点）。
// 字段语义: None = 不修改; Some(raw) = 宽松解析后写入，解析失败视为缺失
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItemPatch {
    pub tvc_id: Option<i64>,
    pub clip_duration: Option<String>,
    pub trp: Option<String>,
    pub affinity1: Option<String>,
    pub affinity2: Option<String>,
    pub channel_share: Option<String>,
    pub pt_zone_share: Option<String>,
    pub npt_zone_share: Option<String>,
    pub gross_cpp: Option<String>,
    pub duration_index: Option<String>,
    pub seasonal_index: Option<String>,
    pub trp_purchase_index: Option<String>,
    pub advance_purchase_index: Option<String>,
    pub position_index: Option<String>,
    pub web_index: Option<String>,
    pub advance_payment_index: Option<String>,
    pub loyalty_discount_index: Option<String>,
}

// ==========================================
// NewLineItem - 新增明细请求
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewLineItem {
    pub channel_group: String,
    pub target_group: String,
    /// 用于从位置指数目录查找 position_index（补丁中显式给出时忽略）
    pub position_type: Option<PositionType>,
    pub fields: LineItemPatch,
}
