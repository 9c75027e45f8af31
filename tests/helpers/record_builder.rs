// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use site_resource_ops::domain::record::DailyRecord;
use site_resource_ops::domain::types::LossReason;

/// 2025-01-{day}
pub fn day(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
}

// ==========================================
// DailyRecord 构建器
// ==========================================
// 默认: planned 1000, actual 1000, disposed 0, unit_cost 5.0, overproduction
// usable 始终由 actual - disposed 推出,除非显式覆写

pub struct RecordBuilder {
    site_id: String,
    date: NaiveDate,
    planned_units: u64,
    actual_units: u64,
    disposed_units: u64,
    usable_override: Option<u64>,
    unit_cost: f64,
    loss_reason: LossReason,
    staffing_shortfall_flag: bool,
    supplier_delay_flag: bool,
    temp_excursion_flag: bool,
}

impl RecordBuilder {
    pub fn new(site_id: &str, date: NaiveDate) -> Self {
        Self {
            site_id: site_id.to_string(),
            date,
            planned_units: 1000,
            actual_units: 1000,
            disposed_units: 0,
            usable_override: None,
            unit_cost: 5.0,
            loss_reason: LossReason::Overproduction,
            staffing_shortfall_flag: false,
            supplier_delay_flag: false,
            temp_excursion_flag: false,
        }
    }

    pub fn planned(mut self, units: u64) -> Self {
        self.planned_units = units;
        self
    }

    pub fn actual(mut self, units: u64) -> Self {
        self.actual_units = units;
        self
    }

    pub fn disposed(mut self, units: u64) -> Self {
        self.disposed_units = units;
        self
    }

    /// 直接指定 usable (可构造不平衡记录)
    pub fn usable(mut self, units: u64) -> Self {
        self.usable_override = Some(units);
        self
    }

    pub fn unit_cost(mut self, cost: f64) -> Self {
        self.unit_cost = cost;
        self
    }

    pub fn reason(mut self, reason: LossReason) -> Self {
        self.loss_reason = reason;
        self
    }

    pub fn staffing_shortfall(mut self) -> Self {
        self.staffing_shortfall_flag = true;
        self
    }

    pub fn supplier_delay(mut self) -> Self {
        self.supplier_delay_flag = true;
        self
    }

    pub fn temp_excursion(mut self) -> Self {
        self.temp_excursion_flag = true;
        self
    }

    pub fn build(self) -> DailyRecord {
        DailyRecord {
            date: self.date,
            site_id: self.site_id,
            planned_units: self.planned_units,
            actual_units: self.actual_units,
            usable_units: self
                .usable_override
                .unwrap_or(self.actual_units - self.disposed_units),
            disposed_units: self.disposed_units,
            unit_cost: self.unit_cost,
            loss_reason: self.loss_reason,
            staffing_shortfall_flag: self.staffing_shortfall_flag,
            supplier_delay_flag: self.supplier_delay_flag,
            temp_excursion_flag: self.temp_excursion_flag,
        }
    }
}

/// 两天示例场景: S001 actual 950/1000, disposed 40/120, unit_cost 5.00
pub fn two_day_scenario() -> Vec<DailyRecord> {
    vec![
        RecordBuilder::new("S001", day(1))
            .actual(950)
            .disposed(40)
            .reason(LossReason::Spoilage)
            .build(),
        RecordBuilder::new("S001", day(2))
            .actual(1000)
            .disposed(120)
            .reason(LossReason::Overproduction)
            .build(),
    ]
}
