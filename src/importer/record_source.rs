// ==========================================
// 站点资源运营系统 - 记录数据源
// ==========================================
// 职责: 文件 → DailyRecord 全流程 (解析 → 映射 → DQ 校验)
// 实现者: FileRecordSource
// 红线: 文件 I/O 在阻塞线程池执行,不占用异步运行时
// ==========================================

use crate::domain::record::DailyRecord;
use crate::importer::dq_validator::{DqReport, DqValidator};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::record_mapper::map_daily_records;
use crate::importer::site_master::SiteMaster;
use crate::perf::PerfGuard;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

/// 一次加载的结果
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    pub records: Vec<DailyRecord>,
    pub dq_report: DqReport,
}

// ==========================================
// RecordSource Trait
// ==========================================
// 用途: 引擎输入的唯一来源
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// 加载并校验全部记录
    ///
    /// 存在 ERROR 级 DQ 违规时返回错误,整批不可用。
    async fn load(&self) -> ImportResult<LoadedRecords>;

    /// 数据源描述 (日志用)
    fn describe(&self) -> String;
}

// ==========================================
// FileRecordSource
// ==========================================
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    data_path: PathBuf,
    site_master_path: Option<PathBuf>,
}

impl FileRecordSource {
    pub fn new<P: Into<PathBuf>>(data_path: P) -> Self {
        Self {
            data_path: data_path.into(),
            site_master_path: None,
        }
    }

    pub fn with_site_master<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.site_master_path = Some(path.into());
        self
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// 同步加载 (在阻塞线程中调用)
    pub fn load_blocking(&self) -> ImportResult<LoadedRecords> {
        let _perf = PerfGuard::new("importer.load");

        let site_master = match &self.site_master_path {
            Some(path) => Some(SiteMaster::load(path)?),
            None => None,
        };

        let table = UniversalFileParser.parse(&self.data_path)?;
        let rows = map_daily_records(&table)?;
        let dq_report = DqValidator::new().check(&rows, site_master.as_ref())?;
        let records: Vec<DailyRecord> = rows.into_iter().map(|(_, r)| r).collect();

        info!(
            path = %self.data_path.display(),
            records = records.len(),
            warnings = dq_report.summary.warning,
            "记录加载完成"
        );

        Ok(LoadedRecords { records, dq_report })
    }
}

#[async_trait]
impl RecordSource for FileRecordSource {
    async fn load(&self) -> ImportResult<LoadedRecords> {
        let source = self.clone();
        tokio::task::spawn_blocking(move || source.load_blocking())
            .await
            .map_err(|e| ImportError::InternalError(format!("任务执行失败: {}", e)))?
    }

    fn describe(&self) -> String {
        match &self.site_master_path {
            Some(master) => format!(
                "file:{} (site master: {})",
                self.data_path.display(),
                master.display()
            ),
            None => format!("file:{}", self.data_path.display()),
        }
    }
}
