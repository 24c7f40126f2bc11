// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::probes::ProbeStrategy;
use crate::workers::log_sink::LogSender;
use crate::workers::probe_worker::{ProbeWorker, SharedUrlQueue};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// 工作器池
///
/// 固定数量的探测工作器共享同一个 URL 队列
pub struct WorkerPool {
    probe: Arc<dyn ProbeStrategy>,
    deadline: Duration,
    size: usize,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// 创建新的工作器池
    ///
    /// # 参数
    ///
    /// * `probe` - 所有工作器共享的探测策略
    /// * `deadline` - 单次探测截止时间
    /// * `size` - 工作器数量
    pub fn new(probe: Arc<dyn ProbeStrategy>, deadline: Duration, size: usize) -> Self {
        Self {
            probe,
            deadline,
            size,
            handles: Vec::new(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// 启动工作器
    ///
    /// 传入的发送端在此被克隆给每个工作器后丢弃，调用方不再持有它们
    pub fn start(
        &mut self,
        urls: SharedUrlQueue,
        results: mpsc::Sender<bool>,
        done: mpsc::Sender<()>,
        log: LogSender,
    ) {
        for id in 0..self.size {
            let worker = ProbeWorker::new(id, self.probe.clone(), self.deadline);
            let handle = tokio::spawn(worker.run(
                urls.clone(),
                results.clone(),
                done.clone(),
                log.clone(),
            ));
            self.handles.push(handle);
        }
        info!(
            "Started {} workers using {} probe",
            self.size,
            self.probe.name()
        );
    }

    /// 等待所有工作器任务结束
    pub async fn join(&mut self) {
        for result in join_all(self.handles.drain(..)).await {
            if let Err(e) = result {
                error!("Worker task failed: {}", e);
            }
        }
    }
}

/// 完成屏障
///
/// 等待 `expected` 个完成信号；所有发送端提前关闭时返回实际收到的数量
pub async fn await_completion(done: &mut mpsc::Receiver<()>, expected: usize) -> usize {
    let mut observed = 0;
    while observed < expected {
        match done.recv().await {
            Some(()) => observed += 1,
            None => break,
        }
    }
    observed
}
