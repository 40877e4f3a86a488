//! # 电子表格解析器
//!
//! 将 CSV/TSV (`csv` crate) 和 XLS/XLSX (`calamine`) 读入统一的
//! 行记录。第一行作为列名，空单元格在此处剔除。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 调用
//! - 使用 `csv`, `calamine` crate

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;

use crate::error::{Result, WebinBulkError};

/// 电子表格中的一行元数据
///
/// 保留列顺序；缺失/空白的单元格不会出现在 `fields` 中。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataRow {
    fields: Vec<(String, String)>,
}

impl MetadataRow {
    /// 追加一个 (列名, 值) 对
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.push((column.into(), value.into()));
    }

    /// 按列名查找值
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    /// 按列顺序迭代 (列名, 值) 对
    pub fn iter(&self) -> impl Iterator<Item = &(String, String)> {
        self.fields.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// 读取 CSV/TSV 电子表格
pub fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<MetadataRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = MetadataRow::default();
        for (column, value) in headers.iter().zip(record.iter()) {
            let value = value.trim();
            if column.is_empty() || value.is_empty() {
                continue;
            }
            row.push(column, value);
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// 读取 XLS/XLSX 电子表格（第一个工作表）
pub fn read_excel(path: &Path) -> Result<Vec<MetadataRow>> {
    let spreadsheet_error = |reason: String| WebinBulkError::SpreadsheetError {
        path: path.display().to_string(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| spreadsheet_error(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| spreadsheet_error("workbook contains no worksheets".to_string()))?
        .map_err(|e| spreadsheet_error(e.to_string()))?;

    let mut cells = range.rows();
    let headers: Vec<String> = match cells.next() {
        Some(header_row) => header_row
            .iter()
            .map(|c| cell_to_string(c).unwrap_or_default())
            .collect(),
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for record in cells {
        let mut row = MetadataRow::default();
        for (column, cell) in headers.iter().zip(record.iter()) {
            if column.is_empty() {
                continue;
            }
            if let Some(value) = cell_to_string(cell) {
                row.push(column, value);
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// 将单元格渲染为字符串，空单元格返回 None
///
/// 整数值的浮点单元格渲染为无小数点形式 (Excel 将所有数字存为浮点)。
fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 9e15 {
                Some(format!("{}", *f as i64))
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_read_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "meta.csv",
            "study_accession,uploaded file 1,insert_size\n\
             PRJEB0001,run1.fastq.gz,250\n\
             PRJEB0002,run2.fastq.gz,300\n",
        );

        let rows = crate::parsers::load_spreadsheet(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("study_accession"), Some("PRJEB0001"));
        assert_eq!(rows[1].get("uploaded file 1"), Some("run2.fastq.gz"));
        assert_eq!(rows[1].get("insert_size"), Some("300"));
    }

    #[test]
    fn test_read_tsv_drops_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "meta.tsv",
            "study_accession\tuploaded file 1\tuploaded file 2\n\
             PRJEB0001\trun1.fastq.gz\t\n",
        );

        let rows = crate::parsers::load_spreadsheet(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0].get("uploaded file 2"), None);
    }

    #[test]
    fn test_read_delimited_skips_blank_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "meta.csv", "a,b\n1,2\n,\n3,4\n");

        let rows = crate::parsers::load_spreadsheet(&path).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_unsupported_extension() {
        let err = crate::parsers::load_spreadsheet(Path::new("meta.pdf"));
        assert!(matches!(err, Err(WebinBulkError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), None);
        assert_eq!(cell_to_string(&Data::String("  ".to_string())), None);
        assert_eq!(
            cell_to_string(&Data::String(" run1.bam ".to_string())),
            Some("run1.bam".to_string())
        );
        // Whole-number floats render without a decimal point
        assert_eq!(cell_to_string(&Data::Float(250.0)), Some("250".to_string()));
        assert_eq!(cell_to_string(&Data::Float(2.5)), Some("2.5".to_string()));
        assert_eq!(cell_to_string(&Data::Int(42)), Some("42".to_string()));
    }
}
