// ==========================================
// 站点资源运营系统 - 站点主数据
// ==========================================
// 输入: site_master.csv / .xlsx (可选)
// 列: site_id (必填), capacity_units / site_type (可选)
// 用途: DQ 产能校验
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawTable, UniversalFileParser};
use crate::importer::record_mapper::validate_columns;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub site_id: String,
    pub capacity_units: Option<u64>,
    pub site_type: Option<String>,
}

/// 站点主数据 (按 site_id 索引)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteMaster {
    sites: BTreeMap<String, SiteInfo>,
}

impl SiteMaster {
    pub fn from_sites(sites: Vec<SiteInfo>) -> Self {
        Self {
            sites: sites
                .into_iter()
                .map(|s| (s.site_id.clone(), s))
                .collect(),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        let table = UniversalFileParser.parse(path)?;
        let master = Self::from_table(&table)?;
        info!(path = %path.display(), sites = master.len(), "站点主数据加载完成");
        Ok(master)
    }

    pub fn from_table(table: &RawTable) -> ImportResult<Self> {
        validate_columns(table, &["site_id"], "site_master")?;

        let mut sites = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let site_id = match row.get("site_id") {
                Some(v) if !v.is_empty() => v.to_string(),
                _ => {
                    return Err(ImportError::TypeConversionError {
                        row: row.row_number,
                        field: "site_id".to_string(),
                        message: "必填字段为空".to_string(),
                    })
                }
            };

            let capacity_units = match row.get("capacity_units") {
                Some(v) if !v.is_empty() => Some(parse_capacity(v).ok_or_else(|| {
                    ImportError::TypeConversionError {
                        row: row.row_number,
                        field: "capacity_units".to_string(),
                        message: format!("不是非负整数: {}", v),
                    }
                })?),
                _ => None,
            };

            let site_type = row
                .get("site_type")
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            sites.push(SiteInfo {
                site_id,
                capacity_units,
                site_type,
            });
        }

        Ok(Self::from_sites(sites))
    }

    pub fn get(&self, site_id: &str) -> Option<&SiteInfo> {
        self.sites.get(site_id)
    }

    pub fn capacity(&self, site_id: &str) -> Option<u64> {
        self.get(site_id).and_then(|s| s.capacity_units)
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

fn parse_capacity(raw: &str) -> Option<u64> {
    if let Ok(v) = raw.parse::<u64>() {
        return Some(v);
    }
    let v = raw.parse::<f64>().ok()?;
    (v.is_finite() && v >= 0.0 && v.fract() == 0.0).then_some(v as u64)
}
