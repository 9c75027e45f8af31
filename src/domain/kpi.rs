// ==========================================
// 站点资源运营系统 - KPI 聚合表领域模型
// ==========================================
// 用途: Aggregator 输出,每次运行重新计算,无独立生命周期
// 红线: 字段名即对外列名,不得随意变更
// ==========================================

use crate::domain::types::LossReason;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// OverallKpi - 全局汇总 (单行)
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OverallKpi {
    pub planned_units: u64,
    pub actual_units: u64,
    pub usable_units: u64,
    pub disposed_units: u64,
    pub cost_leakage: f64,

    pub avg_unit_cost: f64,        // 单位成本简单平均
    pub avg_loss_rate: f64,        // 逐记录损耗率简单平均
    pub avg_utilization_rate: f64, // 逐记录利用率简单平均

    pub shock_days: u64,   // 任一冲击标记为真的记录数
    pub record_count: u64, // 参与记录数
}

// ==========================================
// SiteKpi - 站点汇总 (每站点一行)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteKpi {
    pub site_id: String,

    pub planned_units: u64,
    pub actual_units: u64,
    pub usable_units: u64,
    pub disposed_units: u64,
    pub cost_leakage: f64,

    pub avg_unit_cost: f64,
    pub avg_loss_rate: f64,
    pub avg_utilization_rate: f64,

    /// 加权损耗率 = sum(disposed) / sum(actual),分级引擎读取此值
    pub loss_rate_weighted: f64,

    pub shock_days: u64,
    pub record_count: u64,
}

// ==========================================
// SiteDayKpi - 站点日明细 (每站点每日一行)
// ==========================================
// 同站点同日多条记录时合并:量求和,比率按合并量重算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteDayKpi {
    pub site_id: String,
    pub date: NaiveDate,

    pub planned_units: u64,
    pub actual_units: u64,
    pub usable_units: u64,
    pub disposed_units: u64,

    pub unit_cost: f64,
    pub cost_leakage: f64,
    pub loss_rate: f64,
    pub utilization_rate: f64,

    pub shock_flag: bool,
    pub record_count: u64,
}

// ==========================================
// LossMixRow - 站点损耗原因构成
// ==========================================
// 仅包含出现过的 (site_id, loss_reason) 组合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossMixRow {
    pub site_id: String,
    pub loss_reason: LossReason,
    pub disposed_units: u64,
}

// ==========================================
// KpiTables - 四张聚合表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiTables {
    pub overall: OverallKpi,
    pub by_site: Vec<SiteKpi>,
    pub by_site_day: Vec<SiteDayKpi>,
    pub loss_mix_by_site: Vec<LossMixRow>,
}

// ==========================================
// 展示层汇总 (趋势 / 原因构成)
// ==========================================

/// 按日趋势: 当日成本泄漏合计 + 站点日损耗率平均
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTrendPoint {
    pub date: NaiveDate,
    pub cost_leakage: f64,
    pub loss_rate: f64,
}

/// 全局损耗原因构成
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LossMixShare {
    pub loss_reason: LossReason,
    pub disposed_units: u64,
    pub disposed_share: f64,
}
