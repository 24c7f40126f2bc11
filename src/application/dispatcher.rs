// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::Settings;
use crate::domain::models::RunStatistics;
use crate::infrastructure::url_source::UrlSource;
use crate::probes::ProbeStrategy;
use crate::utils::errors::RunError;
use crate::workers::log_sink::{log_channel, LogSender, LogSink, SinkReport};
use crate::workers::manager::{await_completion, WorkerPool};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{error, info, warn};

/// 调度参数
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// 工作器数量
    pub workers: usize,
    /// 单次探测截止时间
    pub deadline: Duration,
    /// 持久日志文件路径
    pub log_path: PathBuf,
    /// 日志定时刷新间隔
    pub flush_interval: Duration,
    /// 日志队列容量
    pub log_queue_capacity: usize,
}

impl DispatchConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            workers: settings.probe.workers,
            deadline: settings.probe.deadline(),
            log_path: PathBuf::from(&settings.log.path),
            flush_interval: settings.log.flush_interval(),
            log_queue_capacity: settings.log.queue_capacity,
        }
    }
}

/// 调度器
///
/// 编排一次完整运行：启动日志接收器、加载 URL、分发给工作器池、
/// 在完成屏障后汇总结果，最后关闭日志队列并等待排空信号。
pub struct Dispatcher {
    source: Arc<dyn UrlSource>,
    probe: Arc<dyn ProbeStrategy>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(
        source: Arc<dyn UrlSource>,
        probe: Arc<dyn ProbeStrategy>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            source,
            probe,
            config,
        }
    }

    /// 执行一次运行
    ///
    /// # 返回值
    ///
    /// * `Ok(RunStatistics)` - 所有结果已汇总且所有日志已持久化
    /// * `Err(RunError)` - 日志文件无法打开，或 URL 来源加载失败（错误已写入日志）
    pub async fn run(&self) -> Result<RunStatistics, RunError> {
        let sink = LogSink::open(&self.config.log_path, self.config.flush_interval).await?;
        let (log, log_rx) = log_channel(self.config.log_queue_capacity);
        let (sink_handle, drained) = sink.start(log_rx);

        let urls = match self.source.load().await {
            Ok(urls) => urls,
            Err(e) => {
                error!("Failed to load URLs: {}", e);
                log.log(format!("Error importing URLs: {}", e)).await;
                Self::close_log(log, drained).await;
                if let Err(e) = sink_handle.await {
                    error!("Log sink task failed: {}", e);
                }
                return Err(e.into());
            }
        };

        let total = urls.len();
        info!("Loaded {} URLs", total);
        log.log(format!("Number of URLs read from the source: {}", total))
            .await;

        let start = Instant::now();
        let workers = self.config.workers.max(1);

        let (url_tx, url_rx) = mpsc::channel::<String>(total.max(1));
        let (result_tx, mut result_rx) = mpsc::channel::<bool>(total.max(1));
        let (done_tx, mut done_rx) = mpsc::channel::<()>(workers);

        let mut pool = WorkerPool::new(self.probe.clone(), self.config.deadline, workers);
        pool.start(
            Arc::new(Mutex::new(url_rx)),
            result_tx,
            done_tx,
            log.clone(),
        );

        for url in urls {
            if url_tx.send(url).await.is_err() {
                error!("URL queue closed before all URLs were enqueued");
                break;
            }
        }
        // Closing the queue lets the workers' receive loops end.
        drop(url_tx);

        let completed = await_completion(&mut done_rx, workers).await;
        if completed != workers {
            error!("Only {} of {} workers signalled completion", completed, workers);
        }

        let success_count = Self::drain_results(&mut result_rx, total, &log).await;
        pool.join().await;

        let stats = RunStatistics::compute(total, success_count, start.elapsed());
        if stats.is_empty() {
            log.log("No URLs to probe; success rate reported as 0.00%")
                .await;
        }
        log.log(format!(
            "{:.2}% of the URLs were successfully probed.",
            stats.success_percentage
        ))
        .await;
        log.log(format!(
            "Total time taken to probe URLs: {:.3}s",
            stats.total_elapsed.as_secs_f64()
        ))
        .await;

        info!(
            "Probed {} URLs: {} succeeded, {} failed ({:.2}%)",
            stats.total_urls,
            stats.success_count,
            stats.failure_count(),
            stats.success_percentage
        );

        Self::close_log(log, drained).await;
        if let Err(e) = sink_handle.await {
            error!("Log sink task failed: {}", e);
        }

        Ok(stats)
    }

    /// 从结果队列取出恰好 `expected` 个结果并统计成功数
    ///
    /// 队列提前关闭时，缺失的结果按失败计
    async fn drain_results(
        results: &mut mpsc::Receiver<bool>,
        expected: usize,
        log: &LogSender,
    ) -> usize {
        let mut received = 0;
        let mut success_count = 0;

        while received < expected {
            match results.recv().await {
                Some(success) => {
                    received += 1;
                    if success {
                        success_count += 1;
                    }
                }
                None => break,
            }
        }

        if received < expected {
            let missing = expected - received;
            error!("{} results missing, counting them as failures", missing);
            log.log(format!(
                "{} results were never reported and were counted as failures",
                missing
            ))
            .await;
        }

        success_count
    }

    /// 关闭日志队列并等待排空信号
    async fn close_log(log: LogSender, drained: oneshot::Receiver<SinkReport>) -> Option<SinkReport> {
        drop(log);
        match drained.await {
            Ok(report) => {
                if report.write_failures > 0 || report.flush_failures > 0 {
                    warn!(
                        "Log sink reported {} write failures and {} flush failures",
                        report.write_failures, report.flush_failures
                    );
                }
                Some(report)
            }
            Err(_) => {
                error!("Log sink stopped without signalling that it drained");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;
