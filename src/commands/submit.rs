//! # 批量提交命令实现
//!
//! 读取元数据电子表格，逐行生成 manifest 文件，然后（可并行地）
//! 对每个 manifest 运行一次 Webin-CLI。
//!
//! ## 流程
//! - 校验参数（worker 数必须先于任何处理校验）
//! - 读取电子表格
//! - 生成 manifest 文件
//! - 有界并行分发 Webin-CLI 调用
//! - 汇总报告
//!
//! ## 依赖关系
//! - 使用 `cli/mod.rs` 定义的参数
//! - 使用 `parsers/`, `manifest/`, `webin/`, `batch/runner.rs`, `utils/output.rs`

use crate::batch::runner::{BatchRunner, ProcessResult};
use crate::cli::Cli;
use crate::error::{Result, WebinBulkError};
use crate::manifest::ManifestGenerator;
use crate::parsers;
use crate::utils::output;
use crate::webin::{FailedLog, WebinConfig, WebinDispatch};

/// 执行批量提交
pub fn execute(cli: Cli) -> Result<()> {
    // worker 数校验必须发生在读取任何数据之前
    let workers = cli.worker_count()?;

    if !cli.spreadsheet.exists() {
        return Err(WebinBulkError::FileNotFound {
            path: cli.spreadsheet.display().to_string(),
        });
    }

    let directory = cli.data_directory();
    if !directory.exists() {
        return Err(WebinBulkError::DirectoryNotFound {
            path: directory.display().to_string(),
        });
    }

    output::print_header("ENA Webin-CLI Bulk Submission");

    // 读取电子表格
    let rows = parsers::load_spreadsheet(&cli.spreadsheet)?;
    output::print_info(&format!(
        "Loaded {} metadata rows from {}",
        rows.len(),
        cli.spreadsheet.display()
    ));

    // 生成 manifest 文件
    let generator = ManifestGenerator::new(&directory, cli.genetic_context);
    let manifests = generator.generate(&rows)?;
    output::print_info(&format!(
        "Generated {} manifest files in {}",
        manifests.written.len(),
        generator.manifest_dir().display()
    ));

    // Webin-CLI 分发
    let config = WebinConfig {
        jar: cli.jar.clone(),
        username: cli.username.clone(),
        password: cli.password.clone(),
        context: cli.genetic_context,
        mode: cli.mode,
        directory: directory.clone(),
        submission_dir: generator.submission_dir(),
        center_name: cli.center_name.clone(),
        test: cli.test,
    };
    let failed_log = FailedLog::open(directory.join("failed_validation.txt"))?;

    if workers > 1 {
        output::print_info(&format!("Dispatching with {} parallel workers", workers));
    }

    let runner = BatchRunner::new(workers);
    let result = runner.run(manifests.written, |manifest| {
        let dispatch = WebinDispatch::new(&config, manifest);
        match dispatch.run(&failed_log) {
            Ok(true) => ProcessResult::Success(dispatch.prefix().to_string()),
            Ok(false) => ProcessResult::Failed(
                dispatch.prefix().to_string(),
                "validation failed, see failed_validation.txt".to_string(),
            ),
            Err(e) => ProcessResult::Failed(manifest.display().to_string(), e.to_string()),
        }
    });

    // 汇总
    output::print_separator();
    for (name, reason) in &result.failures {
        output::print_error(&format!("{}: {}", name, reason));
    }
    if !manifests.failed.is_empty() {
        output::print_warning(&format!(
            "{} rows skipped during manifest generation: {}",
            manifests.failed.len(),
            manifests.failed.join(", ")
        ));
    }
    if result.failed == 0 && manifests.failed.is_empty() {
        output::print_success("All submissions processed without failures");
    }
    output::print_done(&format!(
        "Processed {} manifests: {} successful, {} failed",
        result.total(),
        result.success,
        result.failed
    ));

    Ok(())
}
