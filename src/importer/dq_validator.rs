// ==========================================
// 站点资源运营系统 - 数据质量校验器实现
// ==========================================
// 职责: DQ 校验 + DQ 报告生成
// 规则:
//   ERROR   - usable + disposed != actual (完整性)
//   ERROR   - unit_cost 为负数或非有限值
//   WARNING - 同一 (site, date) 重复出现
//   WARNING - actual 超过站点产能 (仅在提供站点主数据时)
// 红线: 存在 ERROR 级违规时整批阻断
// ==========================================

use crate::domain::record::DailyRecord;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::site_master::SiteMaster;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DqLevel {
    Error,   // 错误（阻断导入）
    Warning, // 警告（允许导入）
}

// ==========================================
// DqRule - 触发的规则
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DqRule {
    Integrity,
    UnitCost,
    DuplicateSiteDay,
    OverCapacity,
}

// ==========================================
// DqViolation - 数据质量违规记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize, // 原始文件行号
    pub site_id: String,
    pub date: NaiveDate,
    pub level: DqLevel,
    pub rule: DqRule,
    pub field: String,
    pub message: String,
}

// ==========================================
// DqSummary - 数据质量汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_rows: usize, // 总行数
    pub passed: usize,     // 无任何违规的行
    pub blocked: usize,    // 阻断（ERROR）
    pub warning: usize,    // 警告（WARNING）
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqReport {
    pub summary: DqSummary,
    pub violations: Vec<DqViolation>,
}

impl DqReport {
    pub fn has_errors(&self) -> bool {
        self.summary.blocked > 0
    }

    pub fn first_error(&self) -> Option<&DqViolation> {
        self.violations.iter().find(|v| v.level == DqLevel::Error)
    }
}

pub struct DqValidator {
    // 无状态引擎
}

impl DqValidator {
    pub fn new() -> Self {
        Self {}
    }

    /// 生成 DQ 报告 (不阻断)
    ///
    /// `records` 为 (行号, 记录) 对,保持文件顺序。
    pub fn validate(
        &self,
        records: &[(usize, DailyRecord)],
        site_master: Option<&SiteMaster>,
    ) -> DqReport {
        let mut violations = Vec::new();
        let mut seen: HashMap<(&str, NaiveDate), usize> = HashMap::new();

        for (row_number, record) in records {
            let row_number = *row_number;
            let violation = |level: DqLevel, rule: DqRule, field: &str, message: String| {
                DqViolation {
                    row_number,
                    site_id: record.site_id.clone(),
                    date: record.date,
                    level,
                    rule,
                    field: field.to_string(),
                    message,
                }
            };

            if !record.is_balanced() {
                violations.push(violation(
                    DqLevel::Error,
                    DqRule::Integrity,
                    "usable_units,disposed_units,actual_units",
                    format!(
                        "usable({}) + disposed({}) != actual({})",
                        record.usable_units, record.disposed_units, record.actual_units
                    ),
                ));
            }

            if !record.unit_cost.is_finite() || record.unit_cost < 0.0 {
                violations.push(violation(
                    DqLevel::Error,
                    DqRule::UnitCost,
                    "unit_cost",
                    format!("单位成本非法: {}", record.unit_cost),
                ));
            }

            if let Some(first_row) = seen.insert((record.site_id.as_str(), record.date), row_number)
            {
                violations.push(violation(
                    DqLevel::Warning,
                    DqRule::DuplicateSiteDay,
                    "site_id,date",
                    format!("同一站点同一日期重复 (首次出现于行 {})", first_row),
                ));
            }

            let capacity = site_master.and_then(|m| m.capacity(&record.site_id));
            if let Some(capacity) = capacity {
                if record.actual_units > capacity {
                    violations.push(violation(
                        DqLevel::Warning,
                        DqRule::OverCapacity,
                        "actual_units",
                        format!("实际量超过站点产能 ({} > {})", record.actual_units, capacity),
                    ));
                }
            }
        }

        let summary = summarize(records.len(), &violations);
        debug!(
            total_rows = summary.total_rows,
            blocked = summary.blocked,
            warning = summary.warning,
            "DQ 校验完成"
        );

        DqReport {
            summary,
            violations,
        }
    }

    /// 校验并在 ERROR 级违规时阻断
    pub fn check(
        &self,
        records: &[(usize, DailyRecord)],
        site_master: Option<&SiteMaster>,
    ) -> ImportResult<DqReport> {
        let report = self.validate(records, site_master);

        for v in report.violations.iter().filter(|v| v.level == DqLevel::Warning) {
            warn!(row = v.row_number, site_id = %v.site_id, rule = ?v.rule, "{}", v.message);
        }

        let Some(first) = report.first_error() else {
            return Ok(report);
        };

        if first.rule == DqRule::Integrity {
            let offending = records
                .iter()
                .find(|(row, _)| *row == first.row_number)
                .map(|(_, r)| r);
            if let Some(r) = offending {
                return Err(ImportError::Integrity {
                    row: first.row_number,
                    site_id: r.site_id.clone(),
                    actual: r.actual_units,
                    usable: r.usable_units,
                    disposed: r.disposed_units,
                });
            }
        }

        Err(ImportError::DataQuality {
            blocked: report.summary.blocked,
            first: format!(
                "行 {} ({}): {}",
                first.row_number, first.field, first.message
            ),
        })
    }
}

impl Default for DqValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// 按行汇总: 一行有 ERROR 计入 blocked;仅 WARNING 计入 warning
fn summarize(total_rows: usize, violations: &[DqViolation]) -> DqSummary {
    let mut worst: HashMap<usize, DqLevel> = HashMap::new();
    for v in violations {
        worst
            .entry(v.row_number)
            .and_modify(|level| {
                if v.level == DqLevel::Error {
                    *level = DqLevel::Error;
                }
            })
            .or_insert(v.level);
    }

    let blocked = worst.values().filter(|l| **l == DqLevel::Error).count();
    let warning = worst.len() - blocked;

    DqSummary {
        total_rows,
        passed: total_rows.saturating_sub(worst.len()),
        blocked,
        warning,
    }
}
