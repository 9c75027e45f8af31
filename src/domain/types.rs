// ==========================================
// 站点资源运营系统 - 领域类型定义
// ==========================================
// 职责: 损耗原因、风险等级等封闭枚举
// 红线: 等级制,不是评分制;枚举顺序即决胜顺序
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 损耗原因 (Loss Reason)
// ==========================================
// 声明顺序即并列决胜顺序:
//   overproduction < spoilage < damage < timing_mismatch
// 主导原因并列时取顺序靠前者
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossReason {
    Overproduction, // 过量生产
    Spoilage,       // 变质
    Damage,         // 破损
    TimingMismatch, // 时序错配
}

impl LossReason {
    /// 全部损耗原因 (按决胜顺序)
    pub const ALL: [LossReason; 4] = [
        LossReason::Overproduction,
        LossReason::Spoilage,
        LossReason::Damage,
        LossReason::TimingMismatch,
    ];

    /// 序列化/列值使用的代码
    pub fn as_code(&self) -> &'static str {
        match self {
            LossReason::Overproduction => "overproduction",
            LossReason::Spoilage => "spoilage",
            LossReason::Damage => "damage",
            LossReason::TimingMismatch => "timing_mismatch",
        }
    }
}

impl fmt::Display for LossReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

impl FromStr for LossReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "overproduction" => Ok(LossReason::Overproduction),
            "spoilage" => Ok(LossReason::Spoilage),
            "damage" => Ok(LossReason::Damage),
            "timing_mismatch" => Ok(LossReason::TimingMismatch),
            other => Err(format!("未知损耗原因: {}", other)),
        }
    }
}

// ==========================================
// 风险等级 (Risk Status)
// ==========================================
// 有序: Normal < Watch < InterventionRequired
// 序列化为展示层约定的文本
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskStatus {
    #[serde(rename = "Normal")]
    Normal, // 正常
    #[serde(rename = "Watch")]
    Watch, // 关注
    #[serde(rename = "Intervention Required")]
    InterventionRequired, // 需干预
}

impl RiskStatus {
    pub const ALL: [RiskStatus; 3] = [
        RiskStatus::Normal,
        RiskStatus::Watch,
        RiskStatus::InterventionRequired,
    ];

    pub fn as_label(&self) -> &'static str {
        match self {
            RiskStatus::Normal => "Normal",
            RiskStatus::Watch => "Watch",
            RiskStatus::InterventionRequired => "Intervention Required",
        }
    }
}

impl fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_reason_precedence_order() {
        let mut reasons = vec![
            LossReason::TimingMismatch,
            LossReason::Damage,
            LossReason::Overproduction,
            LossReason::Spoilage,
        ];
        reasons.sort();
        assert_eq!(reasons, LossReason::ALL.to_vec());
    }

    #[test]
    fn test_loss_reason_parse() {
        assert_eq!("spoilage".parse::<LossReason>(), Ok(LossReason::Spoilage));
        assert_eq!(
            " Timing_Mismatch ".parse::<LossReason>(),
            Ok(LossReason::TimingMismatch)
        );
        assert!("theft".parse::<LossReason>().is_err());
    }

    #[test]
    fn test_loss_reason_serde_snake_case() {
        let json = serde_json::to_string(&LossReason::TimingMismatch).unwrap();
        assert_eq!(json, "\"timing_mismatch\"");
    }

    #[test]
    fn test_risk_status_ordering_and_labels() {
        assert!(RiskStatus::InterventionRequired > RiskStatus::Watch);
        assert!(RiskStatus::Watch > RiskStatus::Normal);

        let json = serde_json::to_string(&RiskStatus::InterventionRequired).unwrap();
        assert_eq!(json, "\"Intervention Required\"");
        assert_eq!(RiskStatus::Watch.to_string(), "Watch");
    }
}
