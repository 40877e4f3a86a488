//! # 批量执行器
//!
//! 对一组 manifest 并行执行独立的处理任务（无共享可变状态，
//! 共享日志由调用方自行加锁）。
//!
//! ## 功能
//! - 基于 rayon 的有界并行迭代
//! - 进度条显示
//! - 失败收集与汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行执行

use crate::cli::MAX_PARALLEL;
use crate::utils::progress;

use rayon::prelude::*;
use std::path::PathBuf;

/// 单个 manifest 的处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult {
    /// 处理成功
    Success(String),
    /// 处理失败
    Failed(String, String), // (manifest 标识, 失败原因)
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult) {
        match result {
            ProcessResult::Success(_) => self.success += 1,
            ProcessResult::Failed(name, reason) => {
                self.failed += 1;
                self.failures.push((name, reason));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行 worker 数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器（0 表示按 CPU 数自动选择，上限 10）
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 {
            num_cpus::get().min(MAX_PARALLEL)
        } else {
            jobs
        };
        Self { jobs }
    }

    /// 并行处理 manifest 列表
    pub fn run<F>(&self, manifests: Vec<PathBuf>, processor: F) -> BatchResult
    where
        F: Fn(&PathBuf) -> ProcessResult + Sync + Send,
    {
        let pb = progress::create_progress_bar(manifests.len() as u64, "Dispatching");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .expect("failed to build rayon thread pool");

        let results: Vec<ProcessResult> = pool.install(|| {
            manifests
                .par_iter()
                .map(|manifest| {
                    let result = processor(manifest);
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();

        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }
        batch_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_counts() {
        let mut result = BatchResult::default();
        result.merge(ProcessResult::Success("a".to_string()));
        result.merge(ProcessResult::Failed("b".to_string(), "boom".to_string()));
        result.merge(ProcessResult::Success("c".to_string()));

        assert_eq!(result.success, 2);
        assert_eq!(result.failed, 1);
        assert_eq!(result.total(), 3);
        assert_eq!(result.failures, vec![("b".to_string(), "boom".to_string())]);
    }

    #[test]
    fn test_run_processes_every_item() {
        let manifests: Vec<PathBuf> = (0..8)
            .map(|i| PathBuf::from(format!("Manifest_{}.txt", i)))
            .collect();

        let runner = BatchRunner::new(3);
        let result = runner.run(manifests, |manifest| {
            let name = manifest.display().to_string();
            if name.contains('7') {
                ProcessResult::Failed(name, "odd one out".to_string())
            } else {
                ProcessResult::Success(name)
            }
        });

        assert_eq!(result.total(), 8);
        assert_eq!(result.success, 7);
        assert_eq!(result.failed, 1);
    }
}
