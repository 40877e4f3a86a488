//! # Webin-CLI 调用模块
//!
//! 为每个 manifest 构造并运行一次外部 Webin-CLI (java -jar) 命令，
//! 捕获 stdout/stderr 并分类写入报告文件。
//!
//! ## 报告文件
//! - `manifests/<prefix>-report/<prefix>.out` - 验证成功的输出
//! - `manifests/<prefix>-report/<prefix>.err` - 失败输出 (stderr 或不含成功标记的 stdout)
//! - `failed_validation.txt` - 所有失败的共享日志（互斥锁保护并行追加）
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 经 `batch/runner.rs` 调用
//! - 使用 `cli/mod.rs` 的枚举, `chrono` 时间戳

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use crate::cli::{GeneticContext, SubmissionMode};
use crate::error::{Result, WebinBulkError};

/// Webin-CLI 成功输出的判定标记
pub const SUCCESS_MARKER: &str = "The submission has been validated successfully.";

/// 报告文件中的分隔线
fn rule() -> String {
    "*".repeat(100)
}

/// 一次批量运行共用的 Webin-CLI 配置
#[derive(Debug)]
pub struct WebinConfig {
    pub jar: PathBuf,
    pub username: String,
    pub password: String,
    pub context: GeneticContext,
    pub mode: SubmissionMode,
    /// 数据文件父目录 (-inputDir)
    pub directory: PathBuf,
    /// 提交输出目录 (-outputDir)
    pub submission_dir: PathBuf,
    pub center_name: Option<String>,
    pub test: bool,
}

/// 共享的失败日志 (`failed_validation.txt`)
///
/// 追加操作由互斥锁串行化，避免并行 worker 交错写入。
pub struct FailedLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FailedLog {
    /// 以追加模式打开（不存在则创建）
    pub fn open(path: PathBuf) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| WebinBulkError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// 追加一个失败块
    pub fn append(&self, timestamp: &str, prefix: &str, output: &str) -> Result<()> {
        let block = format!(
            "{rule}\n[{timestamp}] {prefix}\n{output}\n{rule}\n",
            rule = rule()
        );
        let mut file = self.file.lock().expect("failed_validation.txt lock poisoned");
        file.write_all(block.as_bytes())
            .map_err(|e| WebinBulkError::FileWriteError {
                path: self.path.display().to_string(),
                source: e,
            })
    }
}

/// 单个 manifest 的一次 Webin-CLI 调用
pub struct WebinDispatch<'a> {
    config: &'a WebinConfig,
    manifest: &'a Path,
    prefix: String,
    report_dir: PathBuf,
    out_path: PathBuf,
    err_path: PathBuf,
}

impl<'a> WebinDispatch<'a> {
    pub fn new(config: &'a WebinConfig, manifest: &'a Path) -> Self {
        let prefix = manifest
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("manifest")
            .to_string();
        let report_dir = manifest
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(format!("{}-report", prefix));
        let out_path = report_dir.join(format!("{}.out", prefix));
        let err_path = report_dir.join(format!("{}.err", prefix));
        Self {
            config,
            manifest,
            prefix,
            report_dir,
            out_path,
            err_path,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// java 的参数向量
    ///
    /// 参数逐个传入 argv，不经过 shell，center name 无需引号处理。
    pub fn argv(&self) -> Vec<OsString> {
        let mut argv: Vec<OsString> = vec![
            "-jar".into(),
            self.config.jar.clone().into(),
            "-context".into(),
            self.config.context.as_str().into(),
            "-userName".into(),
            self.config.username.clone().into(),
            "-password".into(),
            self.config.password.clone().into(),
            "-manifest".into(),
            self.manifest.into(),
            "-inputDir".into(),
            self.config.directory.clone().into(),
            "-outputDir".into(),
            self.config.submission_dir.clone().into(),
        ];
        if let Some(center) = &self.config.center_name {
            argv.push("-centerName".into());
            argv.push(center.into());
        }
        argv.push(self.config.mode.as_flag().into());
        if self.config.test {
            argv.push("-test".into());
        }
        argv
    }

    /// 运行 Webin-CLI 并处理输出，返回是否验证成功
    pub fn run(&self, failed_log: &FailedLog) -> Result<bool> {
        fs::create_dir_all(&self.report_dir).map_err(|e| WebinBulkError::FileWriteError {
            path: self.report_dir.display().to_string(),
            source: e,
        })?;

        let output = Command::new("java").args(self.argv()).output().map_err(|e| {
            WebinBulkError::CommandLaunchError {
                command: format!("java -jar {}", self.config.jar.display()),
                source: e,
            }
        })?;

        let timestamp = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        self.post_process(&output.stdout, &output.stderr, &timestamp, failed_log)
    }

    /// 分类输出并写报告文件
    ///
    /// stderr 非空或 stdout 不含成功标记都算失败；失败内容写入
    /// `.err` 并追加到共享失败日志。`.out`/`.err` 总是被创建。
    fn post_process(
        &self,
        stdout: &[u8],
        stderr: &[u8],
        timestamp: &str,
        failed_log: &FailedLog,
    ) -> Result<bool> {
        let stdout = String::from_utf8_lossy(stdout);
        let stderr = String::from_utf8_lossy(stderr);

        let mut out_content = String::new();
        let mut err_content = String::new();
        let mut success = false;

        if !stderr.is_empty() {
            err_content.push_str(&stderr);
            err_content.push_str(&format!(
                "[{}] VALIDATION FAILED - {}\n",
                timestamp,
                self.manifest.display()
            ));
            failed_log.append(timestamp, &self.prefix, &stderr)?;
        }

        if !stdout.is_empty() {
            if stdout.contains(SUCCESS_MARKER) {
                out_content.push_str(&rule());
                out_content.push('\n');
                out_content.push_str(&stdout);
                out_content.push_str(&format!(
                    "[{}] VALIDATION SUCCESSFUL - {}\n",
                    timestamp,
                    self.manifest.display()
                ));
                out_content.push_str(&rule());
                out_content.push('\n');
                success = stderr.is_empty();
            } else {
                err_content.push_str(&stdout);
                err_content.push_str(&format!(
                    "[{}] VALIDATION FAILED - {}\n",
                    timestamp,
                    self.manifest.display()
                ));
                failed_log.append(timestamp, &self.prefix, &stdout)?;
            }
        }

        for (path, content) in [(&self.out_path, out_content), (&self.err_path, err_content)] {
            fs::write(path, content).map_err(|e| WebinBulkError::FileWriteError {
                path: path.display().to_string(),
                source: e,
            })?;
        }

        Ok(success)
    }
}
