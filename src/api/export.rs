// ==========================================
// 站点资源运营系统 - 报表导出
// ==========================================
// 输出: 每张表 JSON + CSV,另附 manifest.json
// 红线: 同一输入下表文件逐字节一致;仅 manifest 含运行时信息
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::PolicyConfig;
use crate::domain::kpi::{LossMixRow, OverallKpi, SiteDayKpi, SiteKpi};
use crate::domain::status::{SiteDayAnomaly, SiteStatus};
use crate::engine::pipeline::AnalysisOutput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

pub const MANIFEST_FILENAME: &str = "manifest.json";

// ==========================================
// ExportManifest - 运行清单
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub version: String,
    pub scope: String,
    pub counts: TableCounts,
    pub policy: PolicyConfig,
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCounts {
    pub records: u64,
    pub by_site: usize,
    pub by_site_day: usize,
    pub loss_mix_by_site: usize,
    pub site_status: usize,
    pub anomalies: usize,
}

impl TableCounts {
    pub fn of(output: &AnalysisOutput) -> Self {
        Self {
            records: output.overall.record_count,
            by_site: output.by_site.len(),
            by_site_day: output.by_site_day.len(),
            loss_mix_by_site: output.loss_mix_by_site.len(),
            site_status: output.site_status.len(),
            anomalies: output.anomalies.len(),
        }
    }
}

// ==========================================
// ReportTable - 导出表列定义
// ==========================================
// 列顺序与结构体字段声明顺序一致;空表同样写出表头
pub trait ReportTable: Serialize {
    const COLUMNS: &'static [&'static str];
}

impl ReportTable for OverallKpi {
    const COLUMNS: &'static [&'static str] = &[
        "planned_units",
        "actual_units",
        "usable_units",
        "disposed_units",
        "cost_leakage",
        "avg_unit_cost",
        "avg_loss_rate",
        "avg_utilization_rate",
        "shock_days",
        "record_count",
    ];
}

impl ReportTable for SiteKpi {
    const COLUMNS: &'static [&'static str] = &[
        "site_id",
        "planned_units",
        "actual_units",
        "usable_units",
        "disposed_units",
        "cost_leakage",
        "avg_unit_cost",
        "avg_loss_rate",
        "avg_utilization_rate",
        "loss_rate_weighted",
        "shock_days",
        "record_count",
    ];
}

impl ReportTable for SiteDayKpi {
    const COLUMNS: &'static [&'static str] = &[
        "site_id",
        "date",
        "planned_units",
        "actual_units",
        "usable_units",
        "disposed_units",
        "unit_cost",
        "cost_leakage",
        "loss_rate",
        "utilization_rate",
        "shock_flag",
        "record_count",
    ];
}

impl ReportTable for LossMixRow {
    const COLUMNS: &'static [&'static str] = &["site_id", "loss_reason", "disposed_units"];
}

impl ReportTable for SiteStatus {
    const COLUMNS: &'static [&'static str] = &[
        "site_id",
        "status",
        "loss_rate_weighted",
        "cost_leakage",
        "dominant_loss_reason",
        "dominant_loss_share",
        "recommended_action",
        "shock_days",
        "anomaly_days",
    ];
}

impl ReportTable for SiteDayAnomaly {
    const COLUMNS: &'static [&'static str] = &["site_id", "date", "loss_rate", "z_score"];
}

pub struct ReportExporter {
    reports_dir: PathBuf,
}

impl ReportExporter {
    pub fn new<P: Into<PathBuf>>(reports_dir: P) -> Self {
        Self {
            reports_dir: reports_dir.into(),
        }
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// 导出一个作用域的全部表到 `<reports_dir>/<scope>/`
    pub fn export(
        &self,
        scope: &str,
        output: &AnalysisOutput,
        policy: &PolicyConfig,
    ) -> ApiResult<ExportManifest> {
        let dir = self.reports_dir.join(scope);
        fs::create_dir_all(&dir).map_err(|e| ApiError::export(&dir, e))?;

        let mut files = Vec::new();
        write_table(&dir, "overall", std::slice::from_ref(&output.overall), &mut files)?;
        write_table(&dir, "by_site", &output.by_site, &mut files)?;
        write_table(&dir, "by_site_day", &output.by_site_day, &mut files)?;
        write_table(&dir, "loss_mix_by_site", &output.loss_mix_by_site, &mut files)?;
        write_table(&dir, "site_status", &output.site_status, &mut files)?;
        write_table(&dir, "anomalies", &output.anomalies, &mut files)?;

        let manifest = ExportManifest {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            version: crate::VERSION.to_string(),
            scope: scope.to_string(),
            counts: TableCounts::of(output),
            policy: *policy,
            files,
        };
        write_json(&dir.join(MANIFEST_FILENAME), &manifest)?;

        info!(
            run_id = %manifest.run_id,
            dir = %dir.display(),
            files = manifest.files.len(),
            "报表导出完成"
        );
        Ok(manifest)
    }
}

fn write_table<T: ReportTable>(
    dir: &Path,
    name: &str,
    rows: &[T],
    files: &mut Vec<String>,
) -> ApiResult<()> {
    let json_name = format!("{}.json", name);
    write_json(&dir.join(&json_name), &rows)?;
    files.push(json_name);

    let csv_name = format!("{}.csv", name);
    write_csv(&dir.join(&csv_name), rows)?;
    files.push(csv_name);
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> ApiResult<()> {
    let body = serde_json::to_string_pretty(value).map_err(|e| ApiError::export(path, e))?;
    fs::write(path, body).map_err(|e| ApiError::export(path, e))
}

fn write_csv<T: ReportTable>(path: &Path, rows: &[T]) -> ApiResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| ApiError::export(path, e))?;
    writer
        .write_record(T::COLUMNS)
        .map_err(|e| ApiError::export(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| ApiError::export(path, e))?;
    }
    writer.flush().map_err(|e| ApiError::export(path, e))
}
