// ==========================================
// 站点资源运营系统 - API层错误类型
// ==========================================
// 职责: 汇总配置 / 导入 / 引擎 / 导出错误,供调用方统一处理
// ==========================================

use crate::config::ConfigError;
use crate::engine::error::EngineError;
use crate::importer::error::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("数据导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("计算失败: {0}")]
    Engine(#[from] EngineError),

    #[error("报表导出失败 ({path}): {message}")]
    Export { path: String, message: String },

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    pub(crate) fn export(path: impl AsRef<std::path::Path>, err: impl std::fmt::Display) -> Self {
        ApiError::Export {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }

    /// 是否为数据本身的问题 (而非环境 / 程序问题)
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            ApiError::Engine(_)
                | ApiError::Import(ImportError::Integrity { .. })
                | ApiError::Import(ImportError::DataQuality { .. })
                | ApiError::Import(ImportError::MissingColumns { .. })
                | ApiError::Import(ImportError::TypeConversionError { .. })
                | ApiError::Import(ImportError::DateFormatError { .. })
                | ApiError::Import(ImportError::UnknownLossReason { .. })
        )
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
