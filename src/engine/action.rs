// ==========================================
// 站点资源运营系统 - 建议动作映射
// ==========================================
// 职责: (风险等级, 主导损耗原因) → 建议动作文本
// 红线: 映射全覆盖 (3×4) 且纯函数;异常日只追加说明,不改等级
// ==========================================

use crate::domain::types::{LossReason, RiskStatus};

pub const NO_ACTION_REQUIRED: &str = "No action required";

/// 建议动作查表
///
/// | status \ reason      | overproduction | spoilage | damage | timing_mismatch |
/// |----------------------|----------------|----------|--------|-----------------|
/// | Intervention Required| 立即下调计划   | 冷链审计 | 搬运审计 | 供应商排程升级 |
/// | Watch                | 复核预测       | 监控温控 | 复核包装 | 复核排程       |
/// | Normal               | No action required (全部原因)              |
pub fn base_action(status: RiskStatus, reason: LossReason) -> &'static str {
    match (status, reason) {
        (RiskStatus::InterventionRequired, LossReason::Overproduction) => {
            "Cut planned volumes immediately and re-baseline demand forecast"
        }
        (RiskStatus::InterventionRequired, LossReason::Spoilage) => {
            "Audit cold-chain/temperature control immediately"
        }
        (RiskStatus::InterventionRequired, LossReason::Damage) => {
            "Audit handling, storage and packaging practices immediately"
        }
        (RiskStatus::InterventionRequired, LossReason::TimingMismatch) => {
            "Escalate supplier lead-time and scheduling alignment immediately"
        }
        (RiskStatus::Watch, LossReason::Overproduction) => {
            "Review planned volumes against recent demand"
        }
        (RiskStatus::Watch, LossReason::Spoilage) => {
            "Monitor temperature logs and stock rotation"
        }
        (RiskStatus::Watch, LossReason::Damage) => {
            "Review handling procedures and packaging"
        }
        (RiskStatus::Watch, LossReason::TimingMismatch) => {
            "Review scheduling against supplier lead times"
        }
        (RiskStatus::Normal, _) => NO_ACTION_REQUIRED,
    }
}

/// 建议动作 (含异常日说明)
///
/// 非 Normal 且存在异常日时追加异常日数量,Normal 始终为 "No action required"
pub fn recommended_action(status: RiskStatus, reason: LossReason, anomaly_days: u64) -> String {
    let base = base_action(status, reason);
    if status == RiskStatus::Normal || anomaly_days == 0 {
        return base.to_string();
    }

    let noun = if anomaly_days == 1 { "day" } else { "days" };
    format!(
        "{}; investigate {} anomalous loss-rate {}",
        base, anomaly_days, noun
    )
}
