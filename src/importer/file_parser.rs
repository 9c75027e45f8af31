// ==========================================
// 站点资源运营系统 - 文件解析器实现
// ==========================================
// 阶段 0: 文件读取与解析
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 输出: 表头 + 原始行 (列名 → 字符串值,保留原始行号)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 原始行 (未做类型转换)
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 数据行号 (从 1 开始,不含表头)
    pub row_number: usize,
    pub fields: HashMap<String, String>,
}

impl RawRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }
}

/// 原始表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// 文件解析接口
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

/// 按表头组装一行;完全空白的行返回 None
fn build_row<I>(headers: &[String], row_number: usize, values: I) -> Option<RawRow>
where
    I: IntoIterator<Item = String>,
{
    let mut fields = HashMap::new();
    for (col_idx, value) in values.into_iter().enumerate() {
        if let Some(header) = headers.get(col_idx) {
            fields.insert(header.clone(), value.trim().to_string());
        }
    }

    // 跳过完全空白的行
    if fields.values().all(|v| v.is_empty()) {
        return None;
    }

    Some(RawRow { row_number, fields })
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;
        ensure_exists(path)?;

        // 检查扩展名
        if let Some(ext) = path.extension() {
            if !ext.eq_ignore_ascii_case("csv") {
                return Err(ImportError::UnsupportedFormat(
                    ext.to_string_lossy().to_string(),
                ));
            }
        }

        let file = File::open(path)?;
        self.parse_reader(file)
    }
}

impl CsvParser {
    /// 从任意 Reader 解析 (便于内存数据测试)
    pub fn parse_reader<R: std::io::Read>(&self, reader: R) -> ImportResult<RawTable> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(reader);

        // 读取表头
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        // 读取所有行
        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let values = record.iter().map(str::to_string);
            if let Some(row) = build_row(&headers, row_idx + 1, values) {
                rows.push(row);
            }
        }

        Ok(RawTable { headers, rows })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable> {
        let path = file_path;
        ensure_exists(path)?;

        // 检查扩展名
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" && ext != "xls" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(path)?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| cell.to_string().trim().to_string())
            .collect();

        // 读取数据行
        let mut rows = Vec::new();
        for (row_idx, data_row) in sheet_rows.enumerate() {
            let values = data_row.iter().map(|cell| cell.to_string());
            if let Some(row) = build_row(&headers, row_idx + 1, values) {
                rows.push(row);
            }
        }

        Ok(RawTable { headers, rows })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawTable> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_table(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_table(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}
