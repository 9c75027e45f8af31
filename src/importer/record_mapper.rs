// ==========================================
// 站点资源运营系统 - 字段映射器
// ==========================================
// 阶段 1: 列校验 + 类型转换 (原始行 → DailyRecord)
// 红线: 不可解析的行整批失败,不静默跳过
// ==========================================

use crate::domain::record::DailyRecord;
use crate::domain::types::LossReason;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRow, RawTable};
use chrono::{Duration, NaiveDate, NaiveDateTime};

// ==========================================
// 列名 (单一来源)
// ==========================================
pub mod columns {
    pub const SITE_ID: &str = "site_id";
    pub const DATE: &str = "date";

    pub const PLANNED_UNITS: &str = "planned_units";
    pub const ACTUAL_UNITS: &str = "actual_units";
    pub const USABLE_UNITS: &str = "usable_units";
    pub const DISPOSED_UNITS: &str = "disposed_units";
    pub const UNIT_COST: &str = "unit_cost";
    pub const LOSS_REASON: &str = "loss_reason";

    pub const STAFFING_FLAG: &str = "staffing_shortfall_flag";
    pub const SUPPLIER_DELAY_FLAG: &str = "supplier_delay_flag";
    pub const TEMP_EXCURSION_FLAG: &str = "temp_excursion_flag";

    pub const REQUIRED: [&str; 8] = [
        SITE_ID,
        DATE,
        PLANNED_UNITS,
        ACTUAL_UNITS,
        USABLE_UNITS,
        DISPOSED_UNITS,
        UNIT_COST,
        LOSS_REASON,
    ];
}

/// 校验必填列
pub fn validate_columns(table: &RawTable, required: &[&str], name: &str) -> ImportResult<()> {
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !table.headers.iter().any(|h| h == *col))
        .map(|col| col.to_string())
        .collect();

    if !missing.is_empty() {
        return Err(ImportError::MissingColumns {
            name: name.to_string(),
            missing,
        });
    }
    Ok(())
}

/// 原始表 → DailyRecord 列表 (保持文件顺序)
pub fn map_daily_records(table: &RawTable) -> ImportResult<Vec<(usize, DailyRecord)>> {
    validate_columns(table, &columns::REQUIRED, "daily_site_resource")?;
    table.rows.iter().map(|row| Ok((row.row_number, map_row(row)?))).collect()
}

/// 单行映射
pub fn map_row(row: &RawRow) -> ImportResult<DailyRecord> {
    let site_id = required_str(row, columns::SITE_ID)?.to_string();

    let loss_reason_raw = required_str(row, columns::LOSS_REASON)?;
    let loss_reason: LossReason =
        loss_reason_raw
            .parse()
            .map_err(|_| ImportError::UnknownLossReason {
                row: row.row_number,
                value: loss_reason_raw.to_string(),
            })?;

    Ok(DailyRecord {
        date: parse_date(row, columns::DATE)?,
        site_id,
        planned_units: parse_units(row, columns::PLANNED_UNITS)?,
        actual_units: parse_units(row, columns::ACTUAL_UNITS)?,
        usable_units: parse_units(row, columns::USABLE_UNITS)?,
        disposed_units: parse_units(row, columns::DISPOSED_UNITS)?,
        unit_cost: parse_decimal(row, columns::UNIT_COST)?,
        loss_reason,
        staffing_shortfall_flag: parse_flag(row, columns::STAFFING_FLAG)?,
        supplier_delay_flag: parse_flag(row, columns::SUPPLIER_DELAY_FLAG)?,
        temp_excursion_flag: parse_flag(row, columns::TEMP_EXCURSION_FLAG)?,
    })
}

// ==========================================
// 类型转换
// ==========================================

fn required_str<'a>(row: &'a RawRow, field: &str) -> ImportResult<&'a str> {
    match row.get(field) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ImportError::TypeConversionError {
            row: row.row_number,
            field: field.to_string(),
            message: "必填字段为空".to_string(),
        }),
    }
}

/// 非负整数;接受 "950" / "950.0" 这类 Excel 导出的整数浮点
fn parse_units(row: &RawRow, field: &str) -> ImportResult<u64> {
    let raw = required_str(row, field)?;
    if let Ok(v) = raw.parse::<u64>() {
        return Ok(v);
    }

    let conversion_error = |message: String| ImportError::TypeConversionError {
        row: row.row_number,
        field: field.to_string(),
        message,
    };
    let v = raw
        .parse::<f64>()
        .map_err(|_| conversion_error(format!("不是整数: {}", raw)))?;
    if !v.is_finite() || v < 0.0 || v.fract() != 0.0 {
        return Err(conversion_error(format!("必须为非负整数: {}", raw)));
    }
    Ok(v as u64)
}

fn parse_decimal(row: &RawRow, field: &str) -> ImportResult<f64> {
    let raw = required_str(row, field)?;
    raw.parse::<f64>().map_err(|_| ImportError::TypeConversionError {
        row: row.row_number,
        field: field.to_string(),
        message: format!("不是数值: {}", raw),
    })
}

/// 布尔标记;列缺失或为空时取 false
fn parse_flag(row: &RawRow, field: &str) -> ImportResult<bool> {
    let raw = match row.get(field) {
        Some(v) if !v.is_empty() => v,
        _ => return Ok(false),
    };
    match raw.to_lowercase().as_str() {
        "1" | "1.0" | "true" | "yes" | "y" => Ok(true),
        "0" | "0.0" | "false" | "no" | "n" => Ok(false),
        _ => Err(ImportError::TypeConversionError {
            row: row.row_number,
            field: field.to_string(),
            message: format!("不是布尔值: {}", raw),
        }),
    }
}

/// 日期: YYYY-MM-DD,可带时间部分;也接受 Excel 日期序列号
fn parse_date(row: &RawRow, field: &str) -> ImportResult<NaiveDate> {
    let raw = required_str(row, field)?;

    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(d);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt.date());
        }
    }
    if let Some(d) = excel_serial_to_date(raw) {
        return Ok(d);
    }

    Err(ImportError::DateFormatError {
        row: row.row_number,
        field: field.to_string(),
        value: raw.to_string(),
    })
}

/// Excel 序列号 (1900 日期系统,基准 1899-12-30)
fn excel_serial_to_date(raw: &str) -> Option<NaiveDate> {
    let serial = raw.parse::<f64>().ok()?;
    // 1 ~ 2958465 对应 1900-01-01 ~ 9999-12-31
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial.trunc() as i64))
}
