//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数。
//!
//! ## 参数
//! - 账户: `--username`, `--password`, `--centerName`
//! - 输入: `--spreadsheet`, `--directory`, `--geneticContext`
//! - 执行: `--mode`, `--parallel`, `--test`, `--jar`
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 参数传递给 `commands/submit.rs`

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::error::{Result, WebinBulkError};

/// 并行 worker 数上限
pub const MAX_PARALLEL: usize = 10;

/// Webin-CLI 提交上下文 (-context)
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum GeneticContext {
    Genome,
    Transcriptome,
    Sequence,
    Reads,
    Taxrefset,
}

impl GeneticContext {
    /// Webin-CLI 命令行中使用的名称
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneticContext::Genome => "genome",
            GeneticContext::Transcriptome => "transcriptome",
            GeneticContext::Sequence => "sequence",
            GeneticContext::Reads => "reads",
            GeneticContext::Taxrefset => "taxrefset",
        }
    }
}

/// Webin-CLI 运行模式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SubmissionMode {
    /// Validate manifests without submitting
    Validate,
    /// Submit data to the archive
    Submit,
}

impl SubmissionMode {
    /// Webin-CLI 的模式开关 (`-validate` / `-submit`)
    pub fn as_flag(&self) -> &'static str {
        match self {
            SubmissionMode::Validate => "-validate",
            SubmissionMode::Submit => "-submit",
        }
    }
}

/// Webinbulk - ENA Webin-CLI 批量提交工具
#[derive(Parser, Debug)]
#[command(name = "webinbulk")]
#[command(version)]
#[command(about = "Bulk validation and submission of sequencing data through ENA Webin-CLI", long_about = None)]
pub struct Cli {
    /// Webin submission account username (e.g. Webin-XXXXX)
    #[arg(short, long)]
    pub username: String,

    /// Password for the Webin submission account
    #[arg(short, long)]
    pub password: String,

    /// Context for submission
    #[arg(short = 'g', long = "geneticContext", value_enum)]
    pub genetic_context: GeneticContext,

    /// Spreadsheet with submission metadata (.csv, .tsv, .txt, .xls, .xlsx)
    #[arg(short, long)]
    pub spreadsheet: PathBuf,

    /// Parent directory of data files (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// FOR BROKER ACCOUNTS ONLY - center name
    #[arg(short = 'c', long = "centerName")]
    pub center_name: Option<String>,

    /// Webin-CLI mode
    #[arg(short, long, value_enum, default_value = "validate")]
    pub mode: SubmissionMode,

    /// Run submissions in parallel with this many workers (1-10)
    #[arg(long)]
    pub parallel: Option<usize>,

    /// Use the Webin test submission services
    #[arg(short, long, default_value_t = false)]
    pub test: bool,

    /// Path to the Webin-CLI jar file
    #[arg(long, default_value = "/webin-cli.jar", env = "WEBIN_CLI_JAR")]
    pub jar: PathBuf,
}

impl Cli {
    /// 校验 worker 数，必须在处理任何数据之前调用
    pub fn worker_count(&self) -> Result<usize> {
        match self.parallel {
            None => Ok(1),
            Some(n) if (1..=MAX_PARALLEL).contains(&n) => Ok(n),
            Some(n) => Err(WebinBulkError::InvalidArgument(format!(
                "--parallel must be between 1 and {} (inclusive), got {}",
                MAX_PARALLEL, n
            ))),
        }
    }

    /// 数据文件父目录，未指定时为当前目录
    pub fn data_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
