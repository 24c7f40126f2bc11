// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::{ErrorKind, ProbeOutcome};
use crate::probes::ProbeStrategy;
use crate::workers::log_sink::LogSender;
use metrics::{counter, histogram};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

/// 多个工作器共享的 URL 队列接收端
///
/// 每个 URL 只会被一个工作器取走
pub type SharedUrlQueue = Arc<Mutex<mpsc::Receiver<String>>>;

/// 完成信号守卫
///
/// 在工作器退出时发送完成信号，即使工作器任务 panic 也会发送
struct CompletionGuard {
    worker_id: usize,
    done: mpsc::Sender<()>,
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if self.done.try_send(()).is_err() {
            warn!(
                "Worker {}: completion signal could not be delivered",
                self.worker_id
            );
        }
    }
}

/// 探测工作器
pub struct ProbeWorker {
    id: usize,
    probe: Arc<dyn ProbeStrategy>,
    deadline: Duration,
}

impl ProbeWorker {
    pub fn new(id: usize, probe: Arc<dyn ProbeStrategy>, deadline: Duration) -> Self {
        Self {
            id,
            probe,
            deadline,
        }
    }

    /// 运行工作器
    ///
    /// 不断从共享队列取 URL 并探测，直到队列关闭且取空；成功时发送 `true`，
    /// 失败时先写一条失败日志再发送 `false`。循环结束后恰好发送一次完成信号。
    /// 工作器不会关闭结果队列或日志队列。
    pub async fn run(
        self,
        urls: SharedUrlQueue,
        results: mpsc::Sender<bool>,
        done: mpsc::Sender<()>,
        log: LogSender,
    ) {
        let _guard = CompletionGuard {
            worker_id: self.id,
            done,
        };
        debug!("Worker {} started with {} probe", self.id, self.probe.name());

        let mut processed = 0usize;
        while let Some(url) = Self::next_url(&urls).await {
            let success = self.process(&url, &log).await;
            processed += 1;

            if results.send(success).await.is_err() {
                warn!("Worker {}: result queue closed, dropping result for {}", self.id, url);
            }
        }

        debug!("Worker {} finished after {} URLs", self.id, processed);
    }

    async fn next_url(urls: &SharedUrlQueue) -> Option<String> {
        urls.lock().await.recv().await
    }

    async fn process(&self, url: &str, log: &LogSender) -> bool {
        let outcome = self.probe.probe(url, self.deadline).await;

        counter!("probe_attempts_total", "strategy" => self.probe.name()).increment(1);
        histogram!("probe_duration_seconds").record(outcome.duration.as_secs_f64());

        for line in &outcome.diagnostics {
            log.log(format!("Worker {}: {}", self.id, line)).await;
        }

        if !outcome.success {
            let kind = outcome.error_kind.unwrap_or(ErrorKind::NetworkError);
            counter!(
                "probe_failures_total",
                "strategy" => self.probe.name(),
                "kind" => kind.as_str()
            )
            .increment(1);
            log.log(failure_message(self.id, url, &outcome)).await;
        }

        outcome.success
    }
}

/// 生成失败日志行
///
/// 包含工作器编号、URL、耗时和失败类型，足以离线诊断
pub fn failure_message(worker_id: usize, url: &str, outcome: &ProbeOutcome) -> String {
    let kind = outcome.error_kind.unwrap_or(ErrorKind::NetworkError);
    let elapsed = outcome.duration.as_secs_f64();

    if kind == ErrorKind::Timeout {
        return format!(
            "Worker {}: Request to {} timed out after {:.3}s [{}]",
            worker_id, url, elapsed, kind
        );
    }

    let status = outcome
        .status
        .map(|code| format!(" status={}", code))
        .unwrap_or_default();
    format!(
        "Worker {}: Error probing {} after {:.3}s [{}]{}: {}",
        worker_id,
        url,
        elapsed,
        kind,
        status,
        outcome.detail.as_deref().unwrap_or("no detail")
    )
}
