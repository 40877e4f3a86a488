//! # 批量执行模块
//!
//! 提供有界并行的批量处理。
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 使用
//! - 子模块: runner

pub mod runner;
