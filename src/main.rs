//! # Webinbulk - ENA Webin-CLI 批量提交工具
//!
//! 从元数据电子表格批量生成 manifest 文件，并逐个调用外部
//! Webin-CLI jar 进行验证或提交（可选并行，最多 10 个 worker）。
//!
//! ## 流程
//! - 读取电子表格 (CSV/TSV/XLS/XLSX)
//! - 每行生成一个 manifest 文件 (`manifests/Manifest_<prefix>.txt`)
//! - 每个 manifest 运行一次 Webin-CLI，捕获输出并分类
//! - 成功写入 `.out`，失败写入 `.err` 并追加到 `failed_validation.txt`
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── parsers/   (电子表格解析)
//!   │     ├── manifest/  (manifest 生成)
//!   │     └── webin/     (Webin-CLI 调用与报告)
//!   ├── batch/      (并行执行器)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod manifest;
mod parsers;
mod utils;
mod webin;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
