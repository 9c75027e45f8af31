// ==========================================
// 测试文件生成 - 用于导入 / 端到端测试
// ==========================================

use site_resource_ops::domain::record::DailyRecord;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DAILY_HEADER: &str = "date,site_id,planned_units,actual_units,usable_units,disposed_units,unit_cost,loss_reason,staffing_shortfall_flag,supplier_delay_flag,temp_excursion_flag";

/// 写入任意文本行
pub fn write_lines(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(f, "{}", line).unwrap();
    }
    path
}

/// 将记录写为 daily_site_resource.csv 格式
pub fn write_daily_csv(dir: &Path, name: &str, records: &[DailyRecord]) -> PathBuf {
    let mut lines = vec![DAILY_HEADER.to_string()];
    for r in records {
        lines.push(format!(
            "{},{},{},{},{},{},{:.2},{},{},{},{}",
            r.date.format("%Y-%m-%d"),
            r.site_id,
            r.planned_units,
            r.actual_units,
            r.usable_units,
            r.disposed_units,
            r.unit_cost,
            r.loss_reason.as_code(),
            r.staffing_shortfall_flag as u8,
            r.supplier_delay_flag as u8,
            r.temp_excursion_flag as u8,
        ));
    }
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    write_lines(dir, name, &refs)
}
