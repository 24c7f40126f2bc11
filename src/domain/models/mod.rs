// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了探测流水线中流转的数据：
/// - 探测结果（probe_outcome）：单次探测的分类结果
/// - 日志记录（log_record）：写入持久日志的一行
/// - 运行统计（run_statistics）：一次运行的汇总数据
pub mod log_record;
pub mod probe_outcome;
pub mod run_statistics;

pub use log_record::LogRecord;
pub use probe_outcome::{ErrorKind, ProbeOutcome};
pub use run_statistics::RunStatistics;
