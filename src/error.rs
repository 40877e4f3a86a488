//! # 统一错误处理模块
//!
//! 定义 webinbulk 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// webinbulk 统一错误类型
#[derive(Error, Debug)]
pub enum WebinBulkError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 电子表格解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse spreadsheet: {path}\nReason: {reason}")]
    SpreadsheetError { path: String, reason: String },

    #[error("Unsupported spreadsheet format: {0} (expected .csv, .tsv, .txt, .xls or .xlsx)")]
    UnsupportedFormat(String),

    #[error("Row {row} has no '{field}' value to derive a manifest prefix from")]
    MissingField { row: usize, field: String },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to launch Webin-CLI: {command}")]
    CommandLaunchError {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, WebinBulkError>;
