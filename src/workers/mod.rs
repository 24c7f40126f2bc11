// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供探测工作器、工作器池以及持久日志接收器
pub mod log_sink;
pub mod manager;
pub mod probe_worker;

pub use log_sink::{log_channel, LogSender, LogSink, LogWriter, SinkReport};
pub use manager::{await_completion, WorkerPool};
pub use probe_worker::{ProbeWorker, SharedUrlQueue};
