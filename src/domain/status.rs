// ==========================================
// 站点资源运营系统 - 站点风险状态领域模型
// ==========================================
// 用途: Classifier 输出,创建后只读
// ==========================================

use crate::domain::types::{LossReason, RiskStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ==========================================
// SiteStatus - 站点风险状态
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteStatus {
    pub site_id: String,
    pub status: RiskStatus,
    pub loss_rate_weighted: f64,
    pub cost_leakage: f64,
    pub dominant_loss_reason: LossReason,
    pub dominant_loss_share: f64,
    pub recommended_action: String,

    // ===== 下钻诊断 (不参与分级) =====
    pub shock_days: u64,
    pub anomaly_days: u64,
}

impl SiteStatus {
    /// 风险排序: 等级降序 → 成本泄漏降序 → site_id 升序
    pub fn severity_cmp(&self, other: &SiteStatus) -> Ordering {
        other
            .status
            .cmp(&self.status)
            .then_with(|| other.cost_leakage.total_cmp(&self.cost_leakage))
            .then_with(|| self.site_id.cmp(&other.site_id))
    }
}

// ==========================================
// SiteDayAnomaly - 异常日
// ==========================================
// |z| >= SHOCK_ZSCORE_THRESHOLD 的站点日
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteDayAnomaly {
    pub site_id: String,
    pub date: NaiveDate,
    pub loss_rate: f64,
    pub z_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(site_id: &str, status: RiskStatus, cost_leakage: f64) -> SiteStatus {
        SiteStatus {
            site_id: site_id.to_string(),
            status,
            loss_rate_weighted: 0.0,
            cost_leakage,
            dominant_loss_reason: LossReason::Overproduction,
            dominant_loss_share: 0.0,
            recommended_action: String::new(),
            shock_days: 0,
            anomaly_days: 0,
        }
    }

    #[test]
    fn test_severity_cmp_orders_most_severe_first() {
        let mut rows = vec![
            status("S003", RiskStatus::Normal, 90_000.0),
            status("S001", RiskStatus::Watch, 100.0),
            status("S002", RiskStatus::InterventionRequired, 10.0),
            status("S004", RiskStatus::Watch, 500.0),
            status("S000", RiskStatus::Watch, 500.0),
        ];
        rows.sort_by(|a, b| a.severity_cmp(b));

        let ids: Vec<&str> = rows.iter().map(|r| r.site_id.as_str()).collect();
        assert_eq!(ids, vec!["S002", "S000", "S004", "S001", "S003"]);
    }
}
