//! # 解析器模块
//!
//! 提供元数据电子表格的解析器。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 子模块: spreadsheet

pub mod spreadsheet;

use crate::error::{Result, WebinBulkError};
use spreadsheet::MetadataRow;
use std::path::Path;

/// 从文件扩展名推断格式并解析电子表格
pub fn load_spreadsheet(path: &Path) -> Result<Vec<MetadataRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => spreadsheet::read_delimited(path, b','),
        "tsv" | "txt" => spreadsheet::read_delimited(path, b'\t'),
        "xls" | "xlsx" => spreadsheet::read_excel(path),
        _ => Err(WebinBulkError::UnsupportedFormat(
            path.display().to_string(),
        )),
    }
}
