// ==========================================
// 站点资源运营系统 - 日记录领域模型
// ==========================================
// 职责: 每站点每日原始记录 + 派生指标
// 红线: usable_units + disposed_units == actual_units
// ==========================================

use crate::domain::types::LossReason;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DailyRecord - 日运营记录 (输入)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,       // 日期
    pub site_id: String,       // 站点ID

    // ===== 产量 =====
    pub planned_units: u64,    // 计划产量
    pub actual_units: u64,     // 实际产量
    pub usable_units: u64,     // 可用量
    pub disposed_units: u64,   // 报废量

    // ===== 成本与原因 =====
    pub unit_cost: f64,           // 单位成本
    pub loss_reason: LossReason,  // 当日主导损耗原因

    // ===== 冲击标记 =====
    pub staffing_shortfall_flag: bool, // 人手不足
    pub supplier_delay_flag: bool,     // 供应商延误
    pub temp_excursion_flag: bool,     // 温度偏离
}

impl DailyRecord {
    /// 损耗率 = disposed / actual (actual 为 0 时取 0)
    pub fn loss_rate(&self) -> f64 {
        ratio(self.disposed_units, self.actual_units)
    }

    /// 利用率 = actual / planned (planned 为 0 时取 0,不封顶)
    pub fn utilization_rate(&self) -> f64 {
        ratio(self.actual_units, self.planned_units)
    }

    /// 成本泄漏 = disposed * unit_cost
    pub fn cost_leakage(&self) -> f64 {
        self.disposed_units as f64 * self.unit_cost
    }

    /// 是否存在任一冲击标记
    pub fn has_shock(&self) -> bool {
        self.staffing_shortfall_flag || self.supplier_delay_flag || self.temp_excursion_flag
    }

    /// 结构不变量: 可用 + 报废 == 实际
    pub fn is_balanced(&self) -> bool {
        self.usable_units.checked_add(self.disposed_units) == Some(self.actual_units)
    }
}

/// 安全除法,分母为 0 时返回 0
pub(crate) fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(planned: u64, actual: u64, usable: u64, disposed: u64) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            site_id: "S001".to_string(),
            planned_units: planned,
            actual_units: actual,
            usable_units: usable,
            disposed_units: disposed,
            unit_cost: 5.0,
            loss_reason: LossReason::Spoilage,
            staffing_shortfall_flag: false,
            supplier_delay_flag: false,
            temp_excursion_flag: false,
        }
    }

    #[test]
    fn test_derived_metrics() {
        let r = record(1000, 950, 910, 40);
        assert!((r.loss_rate() - 40.0 / 950.0).abs() < 1e-12);
        assert!((r.utilization_rate() - 0.95).abs() < 1e-12);
        assert_eq!(r.cost_leakage(), 200.0);
        assert!(r.is_balanced());
    }

    #[test]
    fn test_zero_denominators_yield_zero() {
        let r = record(0, 0, 0, 0);
        assert_eq!(r.loss_rate(), 0.0);
        assert_eq!(r.utilization_rate(), 0.0);
    }

    #[test]
    fn test_utilization_not_capped() {
        let r = record(800, 1000, 1000, 0);
        assert!((r.utilization_rate() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_unbalanced_record_detected() {
        let r = record(1000, 950, 900, 40);
        assert!(!r.is_balanced());
    }

    #[test]
    fn test_has_shock() {
        let mut r = record(1000, 950, 910, 40);
        assert!(!r.has_shock());
        r.temp_excursion_flag = true;
        assert!(r.has_shock());
    }
}
