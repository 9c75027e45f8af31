// ==========================================
// 站点资源运营系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 两类错误均对整批致命,不做重试、不做逐行跳过
// ==========================================

use chrono::NaiveDate;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 原始记录结构不变量被破坏 (usable + disposed != actual)
    #[error(
        "数据完整性错误: site={site_id}, date={date}, usable({usable}) + disposed({disposed}) != actual({actual})"
    )]
    Integrity {
        site_id: String,
        date: NaiveDate,
        actual: u64,
        usable: u64,
        disposed: u64,
    },

    /// 聚合表之间站点集合不一致
    #[error("聚合表不一致: site={site_id} 在 {present_in} 中存在,但在 {missing_from} 中缺失")]
    SchemaMismatch {
        site_id: String,
        present_in: &'static str,
        missing_from: &'static str,
    },
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
